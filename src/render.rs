use crate::config::Settings;
use crate::model::{Effect, GameState, ItemKind, Scene, CHOMP_MS, SPIN_MS};
use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub(crate) fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }
    pub(crate) fn clear(&mut self, bg: Color) {
        for c in &mut self.cells {
            c.ch = ' ';
            c.fg = Color::White;
            c.bg = bg;
        }
    }
}

pub(crate) struct Terminal {
    pub(crate) out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    pub(crate) prev: CellBuffer,
    pub(crate) cur: CellBuffer,
    mouse_captured: bool,
}

impl Terminal {
    pub(crate) fn begin(capture_mouse: bool) -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )?;
        if capture_mouse {
            execute!(out, crossterm::event::EnableMouseCapture)?;
        }
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        let prev = CellBuffer::new(cols, rows);
        let cur = CellBuffer::new(cols, rows);

        Ok(Self {
            out,
            cols,
            rows,
            prev,
            cur,
            mouse_captured: capture_mouse,
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        if self.mouse_captured {
            execute!(self.out, crossterm::event::DisableMouseCapture)?;
        }
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        Ok(true)
    }

    pub(crate) fn present(&mut self, diff_only: bool) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if diff_only && c == self.prev.cells[i] {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;

                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }

                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

/* -----------------------------
   Screen layout: HUD / yard / button bar
------------------------------ */

/// Fixed rows: HUD on top, a button bar above the key-help line at the
/// bottom, the yard in between. Button spans are evenly spaced across the
/// width, mirroring the source's four fixed button positions.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Layout {
    pub(crate) cols: u16,
    pub(crate) rows: u16,
}

impl Layout {
    pub(crate) fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    pub(crate) fn hud_y(&self) -> u16 {
        0
    }
    pub(crate) fn help_y(&self) -> u16 {
        self.rows.saturating_sub(1)
    }
    pub(crate) fn button_y(&self) -> u16 {
        self.rows.saturating_sub(3)
    }
    pub(crate) fn yard_top(&self) -> i32 {
        2
    }
    pub(crate) fn yard_bottom(&self) -> i32 {
        self.button_y() as i32 - 2
    }

    pub(crate) fn in_yard(&self, col: i32, row: i32) -> bool {
        col >= 0 && col < self.cols as i32 && row >= self.yard_top() && row <= self.yard_bottom()
    }

    pub(crate) fn clamp_to_yard(&self, x: i32, y: i32) -> (i32, i32) {
        let cx = x.clamp(0, self.cols.saturating_sub(1) as i32);
        let cy = y.clamp(self.yard_top(), self.yard_bottom().max(self.yard_top()));
        (cx, cy)
    }

    /// `(item, x0, width)` for each button label on the bar.
    pub(crate) fn button_spans(&self) -> [(ItemKind, u16, u16); 4] {
        let mut spans = [(ItemKind::Apple, 0u16, 0u16); 4];
        for (i, item) in ItemKind::ALL.into_iter().enumerate() {
            let label = button_label(item);
            let w = label.chars().count() as u16;
            let center = (self.cols as u32 * (i as u32 + 1) / 5) as u16;
            let x0 = center.saturating_sub(w / 2);
            spans[i] = (item, x0, w);
        }
        spans
    }

    pub(crate) fn hit_button(&self, col: u16, row: u16) -> Option<ItemKind> {
        if row != self.button_y() {
            return None;
        }
        for (item, x0, w) in self.button_spans() {
            if col >= x0 && col < x0 + w {
                return Some(item);
            }
        }
        None
    }

    /// Pointer hit test against the pet sprite's bounding box.
    pub(crate) fn hit_pet(&self, pet_pos: (i32, i32), col: i32, row: i32) -> bool {
        let (w, h) = (PET_W, PET_H);
        let x0 = pet_pos.0 - w / 2;
        let y0 = pet_pos.1 - h / 2;
        col >= x0 && col < x0 + w && row >= y0 && row < y0 + h
    }
}

pub(crate) fn button_label(item: ItemKind) -> String {
    let key = match item {
        ItemKind::Apple => '1',
        ItemKind::Candy => '2',
        ItemKind::Toy => '3',
        ItemKind::Rotate => '4',
    };
    format!("[{} {}]", key, item.label())
}

/* -----------------------------
   Scene drawing
------------------------------ */

pub(crate) fn draw_text(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color, bg: Color) {
    for (i, ch) in s.chars().enumerate() {
        let xx = x.saturating_add(i as u16);
        if xx >= buf.w || y >= buf.h {
            break;
        }
        buf.set(xx, y, Cell { ch, fg, bg });
    }
}

fn tint(settings: &Settings, color: Color) -> Color {
    if settings.enable_color {
        color
    } else {
        Color::White
    }
}

pub(crate) fn draw_scene(
    buf: &mut CellBuffer,
    st: &GameState,
    layout: &Layout,
    settings: &Settings,
) {
    let bg = Color::Black;
    let fg = Color::White;

    // HUD, same labels as the source
    draw_text(
        buf,
        2,
        layout.hud_y(),
        &format!("Health: {}", st.stats.health),
        tint(settings, Color::Red),
        bg,
    );
    draw_text(
        buf,
        18,
        layout.hud_y(),
        &format!("Fun: {}", st.stats.fun),
        tint(settings, Color::Cyan),
        bg,
    );

    draw_backyard(buf, layout, settings);

    if let Some((item, (ix, iy))) = st.placed_item {
        if ix >= 0 && iy >= 0 {
            buf.set(
                ix as u16,
                iy as u16,
                Cell {
                    ch: item.glyph(),
                    fg: tint(settings, Color::Yellow),
                    bg,
                },
            );
        }
    }

    draw_pet(buf, st, settings);
    draw_button_bar(buf, st, layout, settings);

    let help = match st.scene {
        Scene::Playing => {
            "1/2/3 select | click yard or enter: place | 4/r rotate | drag/arrows move | esc cancel | h help | q quit"
        }
        Scene::Help => "Help: esc or h to close | q quit",
        Scene::GameOver => "Game over: n new game | q quit",
    };
    draw_text(buf, 1, layout.help_y(), help, fg, bg);
}

fn draw_backyard(buf: &mut CellBuffer, layout: &Layout, settings: &Settings) {
    let bg = Color::Black;
    let ground_y = layout.yard_bottom() + 1;
    if ground_y < 0 || ground_y >= buf.h as i32 {
        return;
    }
    let green = tint(settings, Color::DarkGreen);
    for x in 0..buf.w {
        // deterministic tuft pattern, no rng needed
        let ch = match (x as usize * 7 + ground_y as usize) % 5 {
            0 => '"',
            1 => ',',
            _ => '.',
        };
        buf.set(x, ground_y as u16, Cell { ch, fg: green, bg });
    }
}

fn draw_button_bar(buf: &mut CellBuffer, st: &GameState, layout: &Layout, settings: &Settings) {
    let bg = Color::Black;
    let y = layout.button_y();
    for (item, x0, _) in layout.button_spans() {
        // selection dims everything else, a blocked UI dims the whole bar
        let fg = if st.ui_blocked {
            tint(settings, Color::DarkGrey)
        } else if st.selected == Some(item) {
            tint(settings, Color::Yellow)
        } else {
            Color::White
        };
        draw_text(buf, x0, y, &button_label(item), fg, bg);
    }
}

/* -----------------------------
   Pet sprite frames
------------------------------ */

pub(crate) const PET_W: i32 = 9;
pub(crate) const PET_H: i32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PetFrame {
    Neutral,
    Chomp1,
    Chomp2,
    Chomp3,
    Spin(u8),
}

/// Which frame the pet shows right now, derived from the in-flight effect.
/// The chomp runs its three faces yoyo at ~7 fps; the spin is two full
/// turns shown as quarter-step orientations.
pub(crate) fn pet_frame(st: &GameState) -> PetFrame {
    match st.effect {
        Some(Effect::Chomp { elapsed_ms }) => {
            let step = (CHOMP_MS / 6).max(1);
            match (elapsed_ms / step).min(5) {
                0 | 5 => PetFrame::Chomp1,
                1 | 4 => PetFrame::Chomp2,
                _ => PetFrame::Chomp3,
            }
        }
        Some(Effect::Spin { elapsed_ms }) => {
            let quarters = elapsed_ms * 8 / SPIN_MS.max(1);
            PetFrame::Spin((quarters % 4) as u8)
        }
        _ => PetFrame::Neutral,
    }
}

fn pet_grid(frame: PetFrame) -> [&'static str; 5] {
    match frame {
        PetFrame::Neutral => [
            "  _____  ",
            " /     \\ ",
            "| o   o |",
            "|  ___  |",
            " \\_____/ ",
        ],
        PetFrame::Chomp1 => [
            "  _____  ",
            " /     \\ ",
            "| >   < |",
            "|   o   |",
            " \\_____/ ",
        ],
        PetFrame::Chomp2 => [
            "  _____  ",
            " /     \\ ",
            "| ^   ^ |",
            "|   O   |",
            " \\_____/ ",
        ],
        PetFrame::Chomp3 => [
            "  _____  ",
            " /     \\ ",
            "| *   * |",
            "|  \\_/  |",
            " \\_____/ ",
        ],
        PetFrame::Spin(q) => match q {
            0 => [
                "  _____  ",
                " /     \\ ",
                "| o   o |",
                "|  ___  |",
                " \\_____/ ",
            ],
            1 => [
                "  _____  ",
                " /    o\\ ",
                "| )     |",
                "|     o |",
                " \\_____/ ",
            ],
            2 => [
                "  _____  ",
                " /  ___\\ ",
                "| o   o |",
                "|       |",
                " \\_____/ ",
            ],
            _ => [
                "  _____  ",
                " /o     \\",
                "|     ( |",
                "| o     |",
                " \\_____/ ",
            ],
        },
    }
}

pub(crate) fn draw_pet(buf: &mut CellBuffer, st: &GameState, settings: &Settings) {
    let bg = Color::Black;
    let fg = if st.game_over {
        tint(settings, Color::DarkGrey)
    } else {
        Color::White
    };

    let grid = pet_grid(pet_frame(st));
    let x0 = st.pet_pos.0 - PET_W / 2;
    let y0 = st.pet_pos.1 - PET_H / 2;

    for (yy, line) in grid.iter().enumerate() {
        let y = y0 + yy as i32;
        if y < 0 || y >= buf.h as i32 {
            continue;
        }
        let mut x = x0;
        for ch in line.chars() {
            if ch != ' ' && x >= 0 && x < buf.w as i32 {
                buf.set(x as u16, y as u16, Cell { ch, fg, bg });
            }
            x += 1;
        }
    }
}
