use crate::model::{
    Effect, GameState, ItemKind, Scene, StatDelta, CHOMP_MS, DECAY_RATES, SPIN_MS, STAT_FLOOR,
    WALK_MS,
};

#[derive(Clone, Copy, Debug)]
pub(crate) enum PlayerAction {
    Select(ItemKind),
    PlaceAt(i32, i32),
    Rotate,
    DragPet(i32, i32),
    CancelSelection,
    HelpToggle,
    Back,
    NewGame,
    Quit,
}

impl GameState {
    pub(crate) fn apply(&mut self, action: PlayerAction) {
        match action {
            PlayerAction::Select(item) => {
                let _ = self.select_item(item);
            }
            PlayerAction::PlaceAt(x, y) => self.place_selected_item(x, y),
            PlayerAction::Rotate => self.rotate_pet(),
            PlayerAction::DragPet(x, y) => self.drag_pet(x, y),
            PlayerAction::CancelSelection => {
                if !self.ui_blocked {
                    self.reset_ui();
                }
            }
            PlayerAction::HelpToggle => {
                self.scene = match self.scene {
                    Scene::Help => Scene::Playing,
                    Scene::Playing => Scene::Help,
                    Scene::GameOver => Scene::GameOver,
                };
            }
            PlayerAction::Back => {
                if matches!(self.scene, Scene::Help) {
                    self.scene = Scene::Playing;
                }
            }
            PlayerAction::NewGame => {
                *self = GameState::new(self.spawn_pos);
            }
            PlayerAction::Quit => {}
        }
    }

    /// Add each component of `delta` to the matching stat, clamping at the
    /// floor. Any stat hitting the floor ends the session; returns whether
    /// that happened.
    pub(crate) fn apply_delta(&mut self, delta: StatDelta) -> bool {
        let mut hit_floor = false;
        for (stat, d) in [
            (&mut self.stats.health, delta.health),
            (&mut self.stats.fun, delta.fun),
        ] {
            *stat += d;
            if *stat <= STAT_FLOOR {
                *stat = STAT_FLOOR;
                hit_floor = true;
            }
        }
        if hit_floor {
            self.trigger_game_over();
        }
        hit_floor
    }

    /// One fixed decay step. The app loop drives this once per
    /// `DECAY_INTERVAL_MS`; it stops contributing once the session is over.
    pub(crate) fn tick_decay(&mut self) {
        if self.game_over {
            return;
        }
        self.decay_ticks += 1;
        self.apply_delta(DECAY_RATES);
    }

    /// Pick a placeable item, replacing any previous selection. Silently
    /// refused while an action is in flight.
    pub(crate) fn select_item(&mut self, item: ItemKind) -> bool {
        if self.ui_blocked || self.game_over || !item.is_placeable() {
            return false;
        }
        self.reset_ui();
        self.selected = Some(item);
        true
    }

    /// Use the current selection at a yard position: the item delta lands
    /// immediately, then the pet walks over and plays its feedback
    /// animation before the UI unblocks. No selection or a blocked UI
    /// means no-op.
    pub(crate) fn place_selected_item(&mut self, x: i32, y: i32) {
        let Some(item) = self.selected else {
            return;
        };
        if self.ui_blocked || self.game_over {
            return;
        }

        self.ui_blocked = true;
        self.placed_item = Some((item, (x, y)));
        self.effect = Some(Effect::Walk {
            from: self.pet_pos,
            to: (x, y),
            elapsed_ms: 0,
        });
        self.apply_delta(item.delta());
    }

    /// Spin the pet; the rotate delta lands when the spin completes.
    pub(crate) fn rotate_pet(&mut self) {
        if self.ui_blocked || self.game_over {
            return;
        }
        self.reset_ui();
        self.ui_blocked = true;
        self.effect = Some(Effect::Spin { elapsed_ms: 0 });
    }

    /// Clear the selection and unblock the UI. Button affordances are
    /// derived from this state at render time, so nothing else to restore.
    pub(crate) fn reset_ui(&mut self) {
        self.selected = None;
        self.ui_blocked = false;
    }

    /// Reposition the pet directly. Ignored while an effect is driving the
    /// pet so a drag cannot fight the walk.
    pub(crate) fn drag_pet(&mut self, x: i32, y: i32) {
        if self.effect.is_some() || self.game_over {
            return;
        }
        self.pet_pos = (x, y);
    }

    /// Advance the in-flight effect by `dt_ms` of wall time, running its
    /// completion side effects when it finishes.
    pub(crate) fn tick_effect(&mut self, dt_ms: u64) {
        let Some(effect) = self.effect else {
            return;
        };
        match effect {
            Effect::Walk {
                from,
                to,
                elapsed_ms,
            } => {
                let elapsed = elapsed_ms + dt_ms;
                if elapsed >= WALK_MS {
                    self.pet_pos = to;
                    self.placed_item = None;
                    self.effect = Some(Effect::Chomp { elapsed_ms: 0 });
                } else {
                    let t = elapsed as f32 / WALK_MS as f32;
                    self.pet_pos = (
                        from.0 + ((to.0 - from.0) as f32 * t).round() as i32,
                        from.1 + ((to.1 - from.1) as f32 * t).round() as i32,
                    );
                    self.effect = Some(Effect::Walk {
                        from,
                        to,
                        elapsed_ms: elapsed,
                    });
                }
            }
            Effect::Chomp { elapsed_ms } => {
                let elapsed = elapsed_ms + dt_ms;
                if elapsed >= CHOMP_MS {
                    self.effect = None;
                    self.reset_ui();
                } else {
                    self.effect = Some(Effect::Chomp { elapsed_ms: elapsed });
                }
            }
            Effect::Spin { elapsed_ms } => {
                let elapsed = elapsed_ms + dt_ms;
                if elapsed >= SPIN_MS {
                    self.effect = None;
                    self.apply_delta(ItemKind::Rotate.delta());
                    self.reset_ui();
                } else {
                    self.effect = Some(Effect::Spin { elapsed_ms: elapsed });
                }
            }
        }
    }

    fn trigger_game_over(&mut self) {
        self.game_over = true;
        self.scene = Scene::GameOver;
        self.effect = None;
        self.placed_item = None;
        self.reset_ui();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Stats;

    fn fresh() -> GameState {
        GameState::new((10, 5))
    }

    /// Walk the current effect to completion, whatever it chains into.
    fn finish_effects(st: &mut GameState) {
        while st.effect.is_some() {
            st.tick_effect(WALK_MS.max(CHOMP_MS).max(SPIN_MS));
        }
    }

    #[test]
    fn test_stats_never_drop_below_floor() {
        let mut st = fresh();
        st.apply_delta(StatDelta {
            health: -250,
            fun: -250,
        });
        assert_eq!(st.stats, Stats { health: 0, fun: 0 });
    }

    #[test]
    fn test_decay_reaches_game_over_at_tick_twenty() {
        let mut st = fresh();
        for _ in 0..19 {
            st.tick_decay();
        }
        assert_eq!(st.stats, Stats { health: 5, fun: 62 });
        assert!(!st.game_over);

        st.tick_decay();
        assert_eq!(st.stats, Stats { health: 0, fun: 60 });
        assert!(st.game_over);
        assert_eq!(st.decay_ticks, 20);
        assert_eq!(st.scene, Scene::GameOver);
    }

    #[test]
    fn test_fun_alone_reaches_floor_after_fifty_steps() {
        let mut st = fresh();
        let fun_only = StatDelta { health: 0, fun: -2 };
        for _ in 0..49 {
            assert!(!st.apply_delta(fun_only));
        }
        assert_eq!(st.stats.fun, 2);
        assert!(st.apply_delta(fun_only));
        assert_eq!(st.stats.fun, 0);
        assert!(st.game_over);
    }

    #[test]
    fn test_decay_stops_after_game_over() {
        let mut st = fresh();
        for _ in 0..20 {
            st.tick_decay();
        }
        assert!(st.game_over);
        let stats = st.stats;

        st.tick_decay();
        assert_eq!(st.stats, stats);
        assert_eq!(st.decay_ticks, 20);
    }

    #[test]
    fn test_select_while_blocked_is_a_no_op() {
        let mut st = fresh();
        assert!(st.select_item(ItemKind::Apple));
        st.place_selected_item(20, 8);
        assert!(st.ui_blocked);

        assert!(!st.select_item(ItemKind::Candy));
        assert_eq!(st.selected, Some(ItemKind::Apple));
    }

    #[test]
    fn test_rotate_is_not_selectable() {
        let mut st = fresh();
        assert!(!st.select_item(ItemKind::Rotate));
        assert!(st.selected.is_none());
    }

    #[test]
    fn test_place_without_selection_is_a_no_op() {
        let mut st = fresh();
        st.place_selected_item(20, 8);
        assert_eq!(st.stats, Stats { health: 100, fun: 100 });
        assert!(!st.ui_blocked);
        assert!(st.effect.is_none());
    }

    #[test]
    fn test_place_applies_delta_walks_and_resets_ui() {
        let mut st = fresh();
        assert!(st.select_item(ItemKind::Toy));
        st.place_selected_item(30, 9);

        assert_eq!(st.stats, Stats { health: 100, fun: 115 });
        assert!(st.ui_blocked);
        assert_eq!(st.placed_item, Some((ItemKind::Toy, (30, 9))));

        st.tick_effect(WALK_MS);
        assert_eq!(st.pet_pos, (30, 9));
        assert!(st.placed_item.is_none());
        assert!(matches!(st.effect, Some(Effect::Chomp { .. })));
        assert!(st.ui_blocked);

        st.tick_effect(CHOMP_MS);
        assert!(st.effect.is_none());
        assert!(!st.ui_blocked);
        assert!(st.selected.is_none());
        // feedback animation changes no stats
        assert_eq!(st.stats, Stats { health: 100, fun: 115 });
    }

    #[test]
    fn test_walk_interpolates_between_endpoints() {
        let mut st = fresh();
        st.pet_pos = (0, 0);
        assert!(st.select_item(ItemKind::Apple));
        st.place_selected_item(40, 8);

        st.tick_effect(WALK_MS / 2);
        assert_eq!(st.pet_pos, (20, 4));
    }

    #[test]
    fn test_rotate_applies_delta_only_on_completion() {
        let mut st = fresh();
        st.rotate_pet();
        assert!(st.ui_blocked);

        st.tick_effect(SPIN_MS / 2);
        assert_eq!(st.stats, Stats { health: 100, fun: 100 });

        st.tick_effect(SPIN_MS);
        assert_eq!(st.stats, Stats { health: 100, fun: 120 });
        assert!(!st.ui_blocked);
        assert!(st.effect.is_none());
    }

    #[test]
    fn test_rotate_while_blocked_is_a_no_op() {
        let mut st = fresh();
        st.rotate_pet();
        st.rotate_pet();
        finish_effects(&mut st);
        // a second spin would have landed +40
        assert_eq!(st.stats.fun, 120);
    }

    #[test]
    fn test_snack_sequence_scenario() {
        let mut st = fresh();
        st.apply_delta(ItemKind::Apple.delta());
        assert_eq!(st.stats, Stats { health: 120, fun: 100 });

        st.apply_delta(ItemKind::Candy.delta());
        assert_eq!(st.stats, Stats { health: 110, fun: 110 });

        st.tick_decay();
        assert_eq!(st.stats, Stats { health: 105, fun: 108 });
        assert!(!st.game_over);
    }

    #[test]
    fn test_candy_at_low_health_clamps_and_ends_session() {
        let mut st = fresh();
        st.stats = Stats { health: 5, fun: 50 };
        assert!(st.apply_delta(ItemKind::Candy.delta()));
        assert_eq!(st.stats, Stats { health: 0, fun: 60 });
        assert!(st.game_over);
    }

    #[test]
    fn test_fatal_placement_cancels_the_walk() {
        let mut st = fresh();
        st.stats = Stats { health: 5, fun: 50 };
        assert!(st.select_item(ItemKind::Candy));
        st.place_selected_item(30, 9);

        assert!(st.game_over);
        assert!(st.effect.is_none());
        assert!(st.placed_item.is_none());
        assert!(!st.ui_blocked);
        assert!(st.selected.is_none());
    }

    #[test]
    fn test_drag_moves_pet_when_idle_only() {
        let mut st = fresh();
        st.drag_pet(3, 7);
        assert_eq!(st.pet_pos, (3, 7));

        assert!(st.select_item(ItemKind::Apple));
        st.place_selected_item(30, 9);
        st.drag_pet(1, 1);
        assert_ne!(st.pet_pos, (1, 1));
    }

    #[test]
    fn test_selecting_twice_replaces_the_selection() {
        let mut st = fresh();
        assert!(st.select_item(ItemKind::Apple));
        assert!(st.select_item(ItemKind::Candy));
        assert_eq!(st.selected, Some(ItemKind::Candy));
    }

    #[test]
    fn test_cancel_clears_selection() {
        let mut st = fresh();
        assert!(st.select_item(ItemKind::Apple));
        st.apply(PlayerAction::CancelSelection);
        assert!(st.selected.is_none());
    }

    #[test]
    fn test_no_input_revives_a_finished_session() {
        let mut st = fresh();
        st.stats = Stats { health: 5, fun: 50 };
        st.tick_decay();
        assert!(st.game_over);

        assert!(!st.select_item(ItemKind::Apple));
        st.rotate_pet();
        assert!(st.effect.is_none());
        st.drag_pet(0, 0);
        assert_ne!(st.pet_pos, (0, 0));
    }

    #[test]
    fn test_new_game_restores_the_session() {
        let mut st = fresh();
        for _ in 0..20 {
            st.tick_decay();
        }
        assert!(st.game_over);

        st.apply(PlayerAction::NewGame);
        assert_eq!(st.stats, Stats { health: 100, fun: 100 });
        assert!(!st.game_over);
        assert_eq!(st.scene, Scene::Playing);
        assert_eq!(st.pet_pos, st.spawn_pos);
    }
}
