pub(crate) const INITIAL_STAT: i32 = 100;
pub(crate) const STAT_FLOOR: i32 = 0;

pub(crate) const DECAY_INTERVAL_MS: u64 = 1000;
pub(crate) const DECAY_RATES: StatDelta = StatDelta {
    health: -5,
    fun: -2,
};

pub(crate) const WALK_MS: u64 = 500;
pub(crate) const SPIN_MS: u64 = 600;
// 3 feedback frames played yoyo (1-2-3-2-1) at ~7 fps.
pub(crate) const CHOMP_MS: u64 = 860;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Stats {
    pub(crate) health: i32,
    pub(crate) fun: i32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            health: INITIAL_STAT,
            fun: INITIAL_STAT,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct StatDelta {
    pub(crate) health: i32,
    pub(crate) fun: i32,
}

/// The fixed item registry. Deltas live here rather than on the button
/// sprites so the display layer only ever looks them up by kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ItemKind {
    Apple,
    Candy,
    Toy,
    Rotate,
}

impl ItemKind {
    pub(crate) const ALL: [ItemKind; 4] = [
        ItemKind::Apple,
        ItemKind::Candy,
        ItemKind::Toy,
        ItemKind::Rotate,
    ];

    pub(crate) fn delta(self) -> StatDelta {
        match self {
            ItemKind::Apple => StatDelta {
                health: 20,
                fun: 0,
            },
            ItemKind::Candy => StatDelta {
                health: -10,
                fun: 10,
            },
            ItemKind::Toy => StatDelta {
                health: 0,
                fun: 15,
            },
            ItemKind::Rotate => StatDelta {
                health: 0,
                fun: 20,
            },
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            ItemKind::Apple => "Apple",
            ItemKind::Candy => "Candy",
            ItemKind::Toy => "Toy",
            ItemKind::Rotate => "Rotate",
        }
    }

    pub(crate) fn glyph(self) -> char {
        match self {
            ItemKind::Apple => 'o',
            ItemKind::Candy => '*',
            ItemKind::Toy => 'd',
            ItemKind::Rotate => '@',
        }
    }

    /// Apple, candy and toy are selected and then placed in the yard;
    /// rotate triggers its action directly.
    pub(crate) fn is_placeable(self) -> bool {
        !matches!(self, ItemKind::Rotate)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Scene {
    Playing,
    Help,
    GameOver,
}

/// An interactive action's timed visual, ticked by the frame loop. While
/// one is in flight the UI stays blocked; completion side effects run in
/// `GameState::tick_effect`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Effect {
    Walk {
        from: (i32, i32),
        to: (i32, i32),
        elapsed_ms: u64,
    },
    Chomp {
        elapsed_ms: u64,
    },
    Spin {
        elapsed_ms: u64,
    },
}

#[derive(Clone, Debug)]
pub(crate) struct GameState {
    pub(crate) stats: Stats,
    pub(crate) pet_pos: (i32, i32),
    pub(crate) spawn_pos: (i32, i32),
    pub(crate) selected: Option<ItemKind>,
    pub(crate) ui_blocked: bool,
    pub(crate) effect: Option<Effect>,
    pub(crate) placed_item: Option<(ItemKind, (i32, i32))>,
    pub(crate) game_over: bool,
    pub(crate) decay_ticks: u64,
    pub(crate) scene: Scene,
}

impl GameState {
    pub(crate) fn new(pet_pos: (i32, i32)) -> Self {
        Self {
            stats: Stats::default(),
            pet_pos,
            spawn_pos: pet_pos,
            selected: None,
            ui_blocked: false,
            effect: None,
            placed_item: None,
            game_over: false,
            decay_ticks: 0,
            scene: Scene::Playing,
        }
    }
}
