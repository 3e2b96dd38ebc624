use clap::builder::styling::{AnsiColor, Color, Style};
use clap::builder::Styles;
use crossterm::style::{Attribute, Color as CtColor, Stylize};
use unicode_width::UnicodeWidthStr;

// ═══════════════════════════════════════════════════════════════════════════════
// Clap Styles
// ═══════════════════════════════════════════════════════════════════════════════

pub fn get_styles() -> Styles {
    clap::builder::Styles::styled()
        .usage(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .header(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .literal(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
        )
        .invalid(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
        .error(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
        .valid(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack))))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Color Palette - Matrix green and marquee gold
// ═══════════════════════════════════════════════════════════════════════════════

pub mod colors {
    use crossterm::style::Color;

    pub const NEON: Color = Color::Rgb {
        r: 0,
        g: 255,
        b: 170,
    };
    pub const GOLD: Color = Color::Rgb {
        r: 234,
        g: 179,
        b: 8,
    };
    pub const MAGENTA: Color = Color::Rgb {
        r: 255,
        g: 0,
        b: 255,
    };
    pub const GREEN: Color = Color::Rgb {
        r: 0,
        g: 255,
        b: 136,
    };
    pub const ORANGE: Color = Color::Rgb {
        r: 255,
        g: 165,
        b: 0,
    };
    pub const RED: Color = Color::Rgb {
        r: 255,
        g: 85,
        b: 85,
    };
    pub const BLUE: Color = Color::Rgb {
        r: 100,
        g: 149,
        b: 237,
    };
    pub const DIM: Color = Color::Rgb {
        r: 128,
        g: 128,
        b: 128,
    };
    pub const WHITE: Color = Color::Rgb {
        r: 255,
        g: 255,
        b: 255,
    };
}

pub mod box_chars {
    pub const ROUND_TOP_LEFT: &str = "╭";
    pub const ROUND_TOP_RIGHT: &str = "╮";
    pub const ROUND_BOTTOM_LEFT: &str = "╰";
    pub const ROUND_BOTTOM_RIGHT: &str = "╯";
    pub const SINGLE_HORIZONTAL: &str = "─";
    pub const SINGLE_VERTICAL: &str = "│";

    pub const T_LEFT: &str = "├";
    pub const T_RIGHT: &str = "┤";
    pub const T_TOP: &str = "┬";
    pub const T_BOTTOM: &str = "┴";
    pub const CROSS: &str = "┼";

    pub const ARROW_RIGHT: &str = "▶";
    pub const BULLET: &str = "●";
    pub const BULLET_EMPTY: &str = "○";
    pub const DIAMOND: &str = "◆";
    pub const HEART: &str = "♥";
    pub const STAR: &str = "★";
    pub const CHECK: &str = "✓";
    pub const CROSS_MARK: &str = "✗";
    pub const BLOCK_FULL: &str = "█";
    pub const BLOCK_LIGHT: &str = "░";
}

// ═══════════════════════════════════════════════════════════════════════════════
// Banner
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_banner() {
    let banner = r#"
     ██████╗██╗███╗   ██╗███████╗ ██████╗ ██╗   ██╗██╗███████╗
    ██╔════╝██║████╗  ██║██╔════╝██╔═══██╗██║   ██║██║╚══███╔╝
    ██║     ██║██╔██╗ ██║█████╗  ██║   ██║██║   ██║██║  ███╔╝
    ██║     ██║██║╚██╗██║██╔══╝  ██║▄▄ ██║██║   ██║██║ ███╔╝
    ╚██████╗██║██║ ╚████║███████╗╚██████╔╝╚██████╔╝██║███████╗
     ╚═════╝╚═╝╚═╝  ╚═══╝╚══════╝ ╚══▀▀═╝  ╚═════╝ ╚═╝╚══════╝
"#;

    let gradient_colors = [
        colors::NEON,
        colors::NEON,
        colors::GREEN,
        colors::GREEN,
        colors::GOLD,
        colors::GOLD,
        colors::ORANGE,
    ];

    for (i, line) in banner.lines().enumerate() {
        let color = gradient_colors.get(i).unwrap_or(&colors::NEON);
        println!("{}", line.with(*color).bold());
    }

    let subtitle = "  ══════════════  SOUTH INDIAN CINEMA TRIVIA  ══════════════";
    println!("{}", subtitle.with(colors::DIM));
    println!();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Status Indicators
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_success(message: &str) {
    println!(
        " {} {}",
        box_chars::CHECK.to_string().with(colors::GREEN).bold(),
        message.with(colors::GREEN)
    );
}

pub fn print_error(message: &str) {
    println!(
        " {} {}",
        box_chars::CROSS_MARK.to_string().with(colors::RED).bold(),
        message.with(colors::RED)
    );
}

pub fn print_warning(message: &str) {
    println!(
        " {} {}",
        "⚠".with(colors::ORANGE).bold(),
        message.with(colors::ORANGE)
    );
}

pub fn print_info(message: &str) {
    println!(
        " {} {}",
        "ℹ".with(colors::BLUE).bold(),
        message.with(colors::BLUE)
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// Section Headers
// ═══════════════════════════════════════════════════════════════════════════════

const SECTION_WIDTH: usize = 60;

pub fn print_section_header(title: &str) {
    let title_len = title.width();
    let padding = SECTION_WIDTH.saturating_sub(title_len + 4) / 2;

    println!();
    print!("{}", box_chars::ROUND_TOP_LEFT.with(colors::NEON));
    print!(
        "{}",
        box_chars::SINGLE_HORIZONTAL
            .repeat(padding)
            .with(colors::NEON)
    );
    print!(
        " {} ",
        title.with(colors::NEON).bold().attribute(Attribute::Italic)
    );
    print!(
        "{}",
        box_chars::SINGLE_HORIZONTAL
            .repeat(SECTION_WIDTH.saturating_sub(title_len + 2 + padding))
            .with(colors::NEON)
    );
    println!("{}", box_chars::ROUND_TOP_RIGHT.with(colors::NEON));
}

pub fn print_section_footer() {
    print!("{}", box_chars::ROUND_BOTTOM_LEFT.with(colors::NEON));
    print!(
        "{}",
        box_chars::SINGLE_HORIZONTAL
            .repeat(SECTION_WIDTH)
            .with(colors::NEON)
    );
    println!("{}", box_chars::ROUND_BOTTOM_RIGHT.with(colors::NEON));
    println!();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Key-Value Display
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_key_value(key: &str, value: &str) {
    println!(
        "  {} {} {}",
        box_chars::BULLET.with(colors::GOLD),
        format!("{}:", key).with(colors::DIM),
        value.with(colors::WHITE)
    );
}

pub fn print_key_value_highlight(key: &str, value: &str) {
    println!(
        "  {} {} {}",
        box_chars::DIAMOND.with(colors::MAGENTA),
        format!("{}:", key).with(colors::NEON).bold(),
        value.with(colors::GREEN).bold()
    );
}

pub fn print_empty_list(message: &str) {
    println!(
        "  {} {}",
        box_chars::BULLET_EMPTY.with(colors::DIM),
        message.with(colors::DIM).attribute(Attribute::Italic)
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// Game Display
// ═══════════════════════════════════════════════════════════════════════════════

/// Score, hearts and best score on one line.
pub fn print_hud(score: u32, lives: u32, max_lives: u32, high_score: u32) {
    let hearts: String = (0..max_lives.max(lives))
        .map(|i| {
            if i < lives {
                box_chars::HEART.with(colors::RED).to_string()
            } else {
                box_chars::HEART.with(colors::DIM).to_string()
            }
        })
        .collect();
    println!(
        "  {} {}   {}   {} {}",
        "SCORE".with(colors::DIM),
        score.to_string().with(colors::GOLD).bold(),
        hearts,
        box_chars::STAR.with(colors::GOLD),
        format!("best {}", high_score).with(colors::DIM)
    );
}

/// Numbered multiple choice options, starting at 1.
pub fn print_options<S: AsRef<str>>(options: &[S]) {
    for (i, option) in options.iter().enumerate() {
        println!(
            "   {} {}",
            format!("[{}]", i + 1).with(colors::NEON).bold(),
            option.as_ref().with(colors::WHITE)
        );
    }
}

/// Horizontal bar for a 0..=`max` obscurity level.
pub fn meter(level: u8, max: u8, width: usize) -> String {
    let max = max.max(1) as usize;
    let filled = (level as usize).min(max) * width / max;
    format!(
        "{}{}",
        box_chars::BLOCK_FULL.repeat(filled),
        box_chars::BLOCK_LIGHT.repeat(width - filled)
    )
}

pub fn print_meter(label: &str, level: u8, max: u8) {
    println!(
        "  {} {} {}",
        format!("{:<8}", label).with(colors::DIM),
        meter(level, max, 20).with(colors::MAGENTA),
        level.to_string().with(colors::DIM)
    );
}

pub fn print_countdown(seconds_left: u32) {
    let color = if seconds_left < 10 {
        colors::RED
    } else {
        colors::GOLD
    };
    println!(
        "  {} {}",
        "⏱".with(color),
        format!("{}s left", seconds_left).with(color).bold()
    );
}

pub fn print_reveal(message: &str, correct: bool) {
    let (mark, color) = if correct {
        (box_chars::CHECK, colors::GREEN)
    } else {
        (box_chars::CROSS_MARK, colors::RED)
    };
    println!();
    println!(
        "  {} {}",
        mark.with(color).bold(),
        message.with(color).bold()
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// Table Display
// ═══════════════════════════════════════════════════════════════════════════════

pub struct TableBuilder {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    col_widths: Vec<usize>,
}

impl TableBuilder {
    pub fn new(headers: Vec<&str>) -> Self {
        let col_widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
        TableBuilder {
            headers: headers.into_iter().map(String::from).collect(),
            rows: Vec::new(),
            col_widths,
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        for (i, cell) in row.iter().enumerate() {
            if i < self.col_widths.len() {
                self.col_widths[i] = self.col_widths[i].max(cell.width());
            }
        }
        self.rows.push(row);
    }

    fn print_border(&self, left: &str, join: &str, right: &str) {
        print!("{}", left.with(colors::NEON));
        for (i, width) in self.col_widths.iter().enumerate() {
            print!(
                "{}",
                box_chars::SINGLE_HORIZONTAL
                    .repeat(width + 2)
                    .with(colors::NEON)
            );
            if i + 1 < self.col_widths.len() {
                print!("{}", join.with(colors::NEON));
            }
        }
        println!("{}", right.with(colors::NEON));
    }

    fn print_cells(&self, cells: &[String], color: CtColor, bold: bool) {
        print!("{}", box_chars::SINGLE_VERTICAL.with(colors::NEON));
        for (i, cell) in cells.iter().enumerate() {
            let width = self.col_widths.get(i).copied().unwrap_or(0);
            let padding = width.saturating_sub(cell.width());
            let styled = cell.clone().with(color);
            let styled = if bold { styled.bold() } else { styled };
            print!(" {}{} ", styled, " ".repeat(padding));
            print!("{}", box_chars::SINGLE_VERTICAL.with(colors::NEON));
        }
        println!();
    }

    pub fn print(&self) {
        self.print_border(
            box_chars::ROUND_TOP_LEFT,
            box_chars::T_TOP,
            box_chars::ROUND_TOP_RIGHT,
        );
        self.print_cells(&self.headers, colors::NEON, true);
        self.print_border(box_chars::T_LEFT, box_chars::CROSS, box_chars::T_RIGHT);
        for row in &self.rows {
            self.print_cells(row, colors::WHITE, false);
        }
        self.print_border(
            box_chars::ROUND_BOTTOM_LEFT,
            box_chars::T_BOTTOM,
            box_chars::ROUND_BOTTOM_RIGHT,
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Help
// ═══════════════════════════════════════════════════════════════════════════════

pub struct CommandHelp {
    pub name: &'static str,
    pub description: &'static str,
}

pub fn print_help(commands: &[CommandHelp]) {
    print_section_header("Commands");
    for cmd in commands {
        println!(
            "  {} {:<6} {}",
            box_chars::ARROW_RIGHT.with(colors::GOLD),
            cmd.name.with(colors::GREEN).bold(),
            cmd.description.with(colors::WHITE)
        );
    }
    print_section_footer();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Prompt Styling
// ═══════════════════════════════════════════════════════════════════════════════

pub fn get_prompt() -> String {
    format!(
        "{}{}{} ",
        "❯".with(colors::NEON).bold(),
        "❯".with(colors::GREEN).bold(),
        "❯".with(colors::GOLD).bold(),
    )
}

pub fn print_goodbye(high_score: u32) {
    println!();
    println!(
        "  {} {}",
        box_chars::STAR.with(colors::GOLD),
        format!("Thanks for playing! Best score this session: {}", high_score)
            .with(colors::NEON)
            .bold()
    );
    println!();
}
