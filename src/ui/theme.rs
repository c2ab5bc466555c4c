use crate::core::session::ThemeMode;
use crate::ui::builtin_themes::{find_builtin_theme, ThemeSpec};
use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    // Overall background color to paint the full frame
    pub background_color: Color,
    // Chat message styles
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub assistant_text_style: Style,
    pub placeholder_style: Style,

    // Chrome
    pub title_style: Style,
    pub indicator_style: Style,
    pub input_border_style: Style,
    pub input_title_style: Style,
    pub input_text_style: Style,
    pub error_banner_style: Style,

    // Sources block
    pub sources_heading_style: Style,
    pub source_title_style: Style,
    pub source_link_style: Style,

    // Markdown
    pub heading_style: Style,
    pub inline_code_style: Style,
    pub code_block_style: Style,
    pub link_style: Style,
    pub list_marker_style: Style,
    pub blockquote_style: Style,
}

impl Theme {
    pub fn from_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark => Self::dark(),
        }
    }

    pub fn dark() -> Self {
        if let Some(spec) = find_builtin_theme("dark") {
            return Self::from_spec(&spec);
        }
        // Fallback palette-based theme
        Theme {
            background_color: Color::Black,
            user_prefix_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            assistant_text_style: Style::default().fg(Color::White),
            placeholder_style: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),

            title_style: Style::default().fg(Color::Gray),
            indicator_style: Style::default().fg(Color::Cyan),
            input_border_style: Style::default().fg(Color::Gray),
            input_title_style: Style::default().fg(Color::Gray),
            input_text_style: Style::default().fg(Color::White),
            error_banner_style: Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),

            sources_heading_style: Style::default().add_modifier(Modifier::BOLD),
            source_title_style: Style::default().fg(Color::White),
            source_link_style: Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::UNDERLINED),

            heading_style: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            inline_code_style: Style::default().fg(Color::Yellow),
            code_block_style: Style::default().fg(Color::Gray),
            link_style: Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::UNDERLINED),
            list_marker_style: Style::default().fg(Color::Gray),
            blockquote_style: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        }
    }

    pub fn light() -> Self {
        if let Some(spec) = find_builtin_theme("light") {
            return Self::from_spec(&spec);
        }
        // Fallback palette-based theme
        Theme {
            background_color: Color::White,
            user_prefix_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Blue),
            assistant_text_style: Style::default().fg(Color::Black),
            placeholder_style: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),

            title_style: Style::default().fg(Color::DarkGray),
            indicator_style: Style::default().fg(Color::Blue),
            input_border_style: Style::default().fg(Color::Black),
            input_title_style: Style::default().fg(Color::DarkGray),
            input_text_style: Style::default().fg(Color::Black),
            error_banner_style: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),

            sources_heading_style: Style::default().add_modifier(Modifier::BOLD),
            source_title_style: Style::default().fg(Color::Black),
            source_link_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),

            heading_style: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            inline_code_style: Style::default().fg(Color::Magenta),
            code_block_style: Style::default().fg(Color::DarkGray),
            link_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            list_marker_style: Style::default().fg(Color::DarkGray),
            blockquote_style: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        }
    }

    pub fn from_spec(spec: &ThemeSpec) -> Self {
        let background_color = spec
            .background
            .as_deref()
            .and_then(parse_color)
            .unwrap_or(Color::Reset);

        let mut code_block_style = parse_style(&spec.code_block);
        if let Some(bg) = spec.code_block_background.as_deref().and_then(parse_color) {
            code_block_style = code_block_style.bg(bg);
        }

        Theme {
            background_color,
            user_prefix_style: parse_style(&spec.user_prefix),
            user_text_style: parse_style(&spec.user_text),
            assistant_text_style: parse_style(&spec.assistant_text),
            placeholder_style: parse_style(&spec.placeholder),

            title_style: parse_style(&spec.title),
            indicator_style: parse_style(&spec.indicator),
            input_border_style: parse_style(&spec.input_border),
            input_title_style: parse_style(&spec.input_title),
            input_text_style: parse_style(&spec.input_text),
            error_banner_style: parse_style(&spec.error_banner),

            sources_heading_style: parse_style(&spec.sources_heading),
            source_title_style: parse_style(&spec.source_title),
            source_link_style: parse_style(&spec.source_link),

            heading_style: parse_style(&spec.heading),
            inline_code_style: parse_style(&spec.inline_code),
            code_block_style,
            link_style: parse_style(&spec.link),
            list_marker_style: parse_style(&spec.list_marker),
            blockquote_style: parse_style(&spec.blockquote),
        }
    }
}

fn parse_color(s: &str) -> Option<Color> {
    let lower = s.trim().to_ascii_lowercase();
    // Hex: #rgb or #rrggbb
    if let Some(c) = parse_hex_color(&lower) {
        return Some(c);
    }
    if let Some(c) = parse_rgb_func(&lower) {
        return Some(c);
    }
    match lower.as_str() {
        "black" => Some(Color::Black),
        "white" => Some(Color::White),
        "gray" | "grey" => Some(Color::Gray),
        "dark_gray" | "dark-grey" | "darkgray" => Some(Color::DarkGray),
        "red" => Some(Color::Red),
        "light_red" | "light-red" => Some(Color::LightRed),
        "green" => Some(Color::Green),
        "blue" => Some(Color::Blue),
        "light_blue" | "light-blue" => Some(Color::LightBlue),
        "cyan" => Some(Color::Cyan),
        "magenta" => Some(Color::Magenta),
        "yellow" => Some(Color::Yellow),
        "reset" => Some(Color::Reset),
        _ => None,
    }
}

fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => {
            let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

// Format: rgb(r,g,b)
fn parse_rgb_func(s: &str) -> Option<Color> {
    let content = s.strip_prefix("rgb(")?.strip_suffix(')')?;
    let parts: Vec<_> = content
        .split([',', ' '])
        .filter(|t| !t.is_empty())
        .collect();
    if parts.len() != 3 {
        return None;
    }
    let r = parts[0].parse::<u16>().ok()?;
    let g = parts[1].parse::<u16>().ok()?;
    let b = parts[2].parse::<u16>().ok()?;
    Some(Color::Rgb(
        r.min(255) as u8,
        g.min(255) as u8,
        b.min(255) as u8,
    ))
}

fn parse_style(s: &Option<String>) -> Style {
    let mut style = Style::default();
    if let Some(ref spec) = s {
        for tok in spec.split(',').map(|t| t.trim()).filter(|t| !t.is_empty()) {
            if let Some(color) = parse_color(tok) {
                style = style.fg(color);
            } else {
                match tok.to_ascii_lowercase().as_str() {
                    "bold" => style = style.add_modifier(Modifier::BOLD),
                    "italic" => style = style.add_modifier(Modifier::ITALIC),
                    "underlined" => style = style.add_modifier(Modifier::UNDERLINED),
                    "dim" => style = style.add_modifier(Modifier::DIM),
                    "reversed" => style = style.add_modifier(Modifier::REVERSED),
                    _ => {}
                }
            }
        }
    }
    style
}
