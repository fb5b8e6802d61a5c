use crate::config::{load_settings, project_paths, save_settings_atomic, Settings};
use crate::input::{collect_input_nonblocking, map_key_to_action, InputEvent, PointerState};
use crate::model::{GameState, Scene, DECAY_INTERVAL_MS};
use crate::render::{draw_scene, draw_text, Cell, Layout, Terminal};
use crate::session::PlayerAction;
use std::cmp::min;
use std::time::{Duration, Instant};

pub(crate) struct App {
    settings: Settings,
    state: GameState,
    paths: crate::config::Paths,
    term: Terminal,
    pointer: PointerState,
    should_quit: bool,
}

impl App {
    fn init() -> anyhow::Result<Self> {
        let paths = project_paths()?;
        let settings = load_settings(&paths.settings_path);

        let term = Terminal::begin(settings.capture_mouse)?;
        let layout = Layout::new(term.cols, term.rows);
        let spawn = (
            term.cols as i32 / 4,
            (layout.yard_top() + layout.yard_bottom()) / 2,
        );
        let state = GameState::new(spawn);

        Ok(Self {
            settings,
            state,
            paths,
            term,
            pointer: PointerState::default(),
            should_quit: false,
        })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let fps = self.settings.fps_cap.clamp(10, 240);
        let frame_dt = Duration::from_secs_f32(1.0 / fps as f32);
        let decay_step = Duration::from_millis(DECAY_INTERVAL_MS);

        let mut last_frame = Instant::now();
        let mut decay_accum = Duration::ZERO;

        while !self.should_quit {
            let _resized = self.term.resize_if_needed()?;
            let layout = Layout::new(self.term.cols, self.term.rows);

            // input
            let events = collect_input_nonblocking(frame_dt)?;
            for ev in events {
                let action = match ev {
                    InputEvent::Key(code) => {
                        map_key_to_action(&self.state.scene, self.state.pet_pos, code)
                    }
                    _ => self.pointer.mouse_action(
                        &self.state.scene,
                        &layout,
                        self.state.pet_pos,
                        ev,
                    ),
                };
                if let Some(action) = action {
                    match action {
                        PlayerAction::Quit => {
                            self.should_quit = true;
                            break;
                        }
                        _ => self.state.apply(action),
                    }
                }
            }

            // fixed-step decay + per-frame effect progress
            let now = Instant::now();
            let real_dt = now.saturating_duration_since(last_frame);
            last_frame = now;

            decay_accum = decay_accum.saturating_add(real_dt);
            while decay_accum >= decay_step {
                self.state.tick_decay();
                decay_accum = decay_accum.saturating_sub(decay_step);
            }
            self.state.tick_effect(real_dt.as_millis() as u64);

            // render
            self.render_frame(&layout)?;

            // frame cap
            spin_sleep(frame_dt, Instant::now());
        }

        self.term.end()?;
        save_settings_atomic(&self.paths.settings_path, &self.settings)?;
        Ok(())
    }

    fn render_frame(&mut self, layout: &Layout) -> anyhow::Result<()> {
        let bg = crossterm::style::Color::Black;
        self.term.cur.clear(bg);

        draw_scene(&mut self.term.cur, &self.state, layout, &self.settings);

        if let Scene::Help = self.state.scene {
            self.draw_center_box(
                "How to play",
                "Keep your pet's health and fun above zero.\n\
    Both decay every second (health -5, fun -2).\n\n\
    1 Apple:  health +20\n\
    2 Candy:  health -10, fun +10\n\
    3 Toy:    fun +15\n\
    4 Rotate: fun +20 (spins the pet)\n\n\
    Pick an item, then click the yard (or press Enter)\n\
    to have the pet walk over and use it.\n\
    Drag the pet with the mouse or nudge it with arrows.\n\n\
    Esc or H to close help.",
            )?;
        }

        if let Scene::GameOver = self.state.scene {
            self.draw_center_box(
                "Game over",
                &format!(
                    "A stat hit zero after {} seconds.\n\nHealth: {}\nFun: {}\n\nPress N for a new pet, or Q to quit.",
                    self.state.decay_ticks, self.state.stats.health, self.state.stats.fun
                ),
            )?;
        }

        self.term.present(true)?;
        Ok(())
    }

    fn draw_center_box(&mut self, title: &str, body: &str) -> anyhow::Result<()> {
        let w = self.term.cols;
        let h = self.term.rows;

        let bw = min(58, w.saturating_sub(4));
        let bh = min(18, h.saturating_sub(4));

        let x0 = (w - bw) / 2;
        let y0 = (h - bh) / 2;

        let fg = crossterm::style::Color::White;
        let bg = crossterm::style::Color::Black;

        for y in y0..y0 + bh {
            for x in x0..x0 + bw {
                let ch = if y == y0 || y == y0 + bh - 1 {
                    if x == x0 {
                        if y == y0 {
                            '┌'
                        } else {
                            '└'
                        }
                    } else if x == x0 + bw - 1 {
                        if y == y0 {
                            '┐'
                        } else {
                            '┘'
                        }
                    } else {
                        '─'
                    }
                } else if x == x0 || x == x0 + bw - 1 {
                    '│'
                } else {
                    ' '
                };
                self.term.cur.set(x, y, Cell { ch, fg, bg });
            }
        }

        draw_text(&mut self.term.cur, x0 + 2, y0 + 1, title, fg, bg);

        let mut yy = y0 + 3;
        for line in body.lines() {
            if yy >= y0 + bh - 1 {
                break;
            }
            draw_text(&mut self.term.cur, x0 + 2, yy, line, fg, bg);
            yy += 1;
        }

        Ok(())
    }
}

pub(crate) fn run() -> anyhow::Result<()> {
    let mut app = App::init()?;
    app.run()?;
    Ok(())
}

/* -----------------------------
   Frame pacing helper
------------------------------ */

fn spin_sleep(target: Duration, now: Instant) {
    let end = now + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
