use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::components::{self, TextInputConfig};
use super::theme::Palette;
use super::utils::centered_rect;

use crate::app::{App, AuthField, AuthStep};

pub fn render_auth_view(f: &mut Frame, app: &App) {
    let palette = Palette::for_mode(app.dark_mode);
    let screen = f.area();
    f.render_widget(
        Block::default().style(Style::default().bg(palette.surface)),
        screen,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(screen);
    let (body, footer) = match &chunks[..] {
        [body, footer] => (*body, *footer),
        _ => return,
    };

    let card = centered_rect(50, 60, body);
    f.render_widget(Clear, card);
    f.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled("Parlor", palette.brand_title()),
                Span::styled(" sign in ", Style::default().fg(palette.accent)),
            ]))
            .border_style(Style::default().fg(palette.border))
            .style(Style::default().bg(palette.surface)),
        card,
    );

    match app.auth.step {
        AuthStep::Phone | AuthStep::SendingOtp => render_phone_step(f, app, &palette, card),
        AuthStep::Otp | AuthStep::Verifying | AuthStep::Verified => {
            render_otp_step(f, app, &palette, card);
        }
    }
    render_auth_footer(f, app, &palette, footer);

    if let Some(message) = app.status_toast_message() {
        components::render_status_toast(f, components::toast_area(card), &palette, message);
    }
}

fn render_phone_step(f: &mut Frame, app: &App, palette: &Palette, card: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // Country
            Constraint::Length(3), // Phone
            Constraint::Length(1), // Error
            Constraint::Min(0),
            Constraint::Length(1), // Status
        ])
        .split(card);
    let Some([country, phone, error, _, status]) =
        chunks.get(0..5).and_then(|s| <&[_; 5]>::try_from(s).ok())
    else {
        return;
    };

    let editable = app.auth.step == AuthStep::Phone;
    let country_focused = editable && app.auth.field == AuthField::Country;
    let country_label = app
        .auth
        .selected_country()
        .map_or_else(|| "Select a country".to_string(), |country| country.label());
    let country_style = if app.auth.country.is_some() {
        Style::default().fg(palette.text)
    } else {
        Style::default().fg(palette.muted)
    };
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(" ◀ ", Style::default().fg(palette.accent)),
            Span::styled(country_label, country_style),
            Span::styled(" ▶ ", Style::default().fg(palette.accent)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" Country ", Style::default().fg(palette.text)))
                .border_style(Style::default().fg(if country_focused {
                    palette.accent
                } else {
                    palette.border
                })),
        ),
        *country,
    );

    let dial_code = app
        .auth
        .selected_country()
        .map_or(String::new(), |country| format!(" Phone {} ", country.dial_code));
    let phone_title = if dial_code.is_empty() { " Phone " } else { dial_code.as_str() };
    components::render_text_input(
        f,
        *phone,
        palette,
        TextInputConfig::new(app.auth.phone.content(), phone_title)
            .with_placeholder("Phone number")
            .with_cursor_visible(editable && app.auth.field == AuthField::Phone)
            .with_cursor_position(app.auth.phone.cursor_position()),
    );

    if let Some(message) = &app.auth.error {
        f.render_widget(
            Paragraph::new(Span::styled(
                format!(" {}", message),
                Style::default().fg(palette.error),
            )),
            *error,
        );
    }

    let status_text = if app.auth.step == AuthStep::SendingOtp {
        "Sending OTP..."
    } else {
        "Press Enter to send OTP"
    };
    f.render_widget(
        Paragraph::new(Span::styled(status_text, Style::default().fg(palette.muted)))
            .alignment(Alignment::Center),
        *status,
    );
}

fn render_otp_step(f: &mut Frame, app: &App, palette: &Palette, card: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(2), // Sent-to line
            Constraint::Length(3), // Code
            Constraint::Min(0),
            Constraint::Length(1), // Status
        ])
        .split(card);
    let Some([sent_to, code, _, status]) =
        chunks.get(0..4).and_then(|s| <&[_; 4]>::try_from(s).ok())
    else {
        return;
    };

    let dial_code = app
        .auth
        .selected_country()
        .map_or("", |country| country.dial_code.as_str());
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Code sent to ", Style::default().fg(palette.muted)),
            Span::styled(
                format!("{} {}", dial_code, app.auth.phone.content()),
                Style::default().fg(palette.text).add_modifier(Modifier::BOLD),
            ),
        ])),
        *sent_to,
    );

    components::render_text_input(
        f,
        *code,
        palette,
        TextInputConfig::new(app.auth.otp.content(), " One-time code ")
            .with_placeholder("6 digits")
            .with_cursor_visible(app.auth.step == AuthStep::Otp)
            .with_cursor_position(app.auth.otp.cursor_position()),
    );

    let status_text = match app.auth.step {
        AuthStep::Verifying => "Verifying...",
        AuthStep::Verified => "Logging in...",
        AuthStep::Phone | AuthStep::SendingOtp | AuthStep::Otp => "Press Enter to verify",
    };
    f.render_widget(
        Paragraph::new(Span::styled(status_text, Style::default().fg(palette.muted)))
            .alignment(Alignment::Center),
        *status,
    );
}

fn render_auth_footer(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let keybindings: &[(&str, &str)] = match app.auth.step {
        AuthStep::Phone => &[
            ("Tab", "field"),
            ("←/→", "country"),
            ("Enter", "send OTP"),
            ("Ctrl+C", "quit"),
        ],
        AuthStep::Otp => &[("Enter", "verify"), ("Esc", "back"), ("Ctrl+C", "quit")],
        AuthStep::SendingOtp | AuthStep::Verifying | AuthStep::Verified => &[("Ctrl+C", "quit")],
    };
    components::render_navigation_footer(f, area, palette, "SIGN IN", keybindings, &[]);
}
