use crate::core::store::ThemePreference;
use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    // Overall background color to paint the full frame
    pub background_color: Color,

    // Chat message styles
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub assistant_text_style: Style,
    pub error_text_style: Style,
    pub pending_indicator_style: Style,

    // Greeting screen
    pub greeting_title_style: Style,
    pub greeting_text_style: Style,
    pub suggestion_key_style: Style,
    pub suggestion_text_style: Style,

    // Chrome
    pub title_style: Style,
    pub notice_style: Style,
    pub input_border_style: Style,
    pub input_title_style: Style,
    pub input_text_style: Style,
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            background_color: Color::Black,
            user_prefix_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            assistant_text_style: Style::default().fg(Color::White),
            error_text_style: Style::default().fg(Color::Red),
            pending_indicator_style: Style::default().fg(Color::DarkGray),

            greeting_title_style: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            greeting_text_style: Style::default().fg(Color::Gray),
            suggestion_key_style: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            suggestion_text_style: Style::default().fg(Color::White),

            title_style: Style::default().fg(Color::Gray),
            notice_style: Style::default().fg(Color::Green),
            input_border_style: Style::default().fg(Color::Gray),
            input_title_style: Style::default().fg(Color::Gray),
            input_text_style: Style::default().fg(Color::White),
        }
    }

    pub fn light() -> Self {
        Theme {
            background_color: Color::White,
            user_prefix_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Blue),
            assistant_text_style: Style::default().fg(Color::Black),
            error_text_style: Style::default().fg(Color::Red),
            pending_indicator_style: Style::default().fg(Color::Gray),

            greeting_title_style: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            greeting_text_style: Style::default().fg(Color::DarkGray),
            suggestion_key_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            suggestion_text_style: Style::default().fg(Color::Black),

            title_style: Style::default().fg(Color::DarkGray),
            notice_style: Style::default().fg(Color::Green),
            input_border_style: Style::default().fg(Color::Black),
            input_title_style: Style::default().fg(Color::DarkGray),
            input_text_style: Style::default().fg(Color::Black),
        }
    }

    pub fn for_preference(preference: ThemePreference) -> Self {
        match preference {
            ThemePreference::Dark => Self::dark_default(),
            ThemePreference::Light => Self::light(),
        }
    }
}
