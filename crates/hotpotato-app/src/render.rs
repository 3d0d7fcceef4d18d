//! Plain-text rendering of the game view.

use std::fmt::Write;

use hotpotato_core::types::Screen;
use hotpotato_game::View;

pub const HELP: &str = "\
Commands:
  <enter>         start / stop / next round, depending on the screen
  start, stop     start or stop a round
  skip            show another prompt
  next            next round
  lang [code]     language selector, or switch straight to en/el/bg/mk/sq
  safe [on|off]   toggle safe mode
  toggle <key>    enable or disable a category
  mute            toggle mute
  pause           pause all audio
  support, close  open or close the support panel
  help, quit";

/// Render the whole screen for `view`.
pub fn render(view: &View) -> String {
    let ui = &view.ui;
    let mut out = String::new();

    let mut status = format!("== {} ==  [{}]", ui.footer, view.audio_status);
    if view.round > 0 {
        let _ = write!(status, " [round {}]", view.round);
    }
    if view.safe_mode {
        let _ = write!(status, " [{}]", ui.safe_mode);
    }
    let _ = writeln!(out, "{}", status);

    match view.screen {
        Screen::LanguageSelect => {
            let _ = writeln!(out, "{}", ui.tagline);
            let _ = writeln!(out, "{}:", ui.language_select);
            for entry in &view.languages {
                let _ = writeln!(out, "  lang {}   {}", entry.language.code(), entry.native_name);
            }
            let _ = writeln!(out, "{}", ui.lang_hint);
        }
        Screen::Instructions => {
            let _ = writeln!(out, "{}", ui.instructions_title);
            for line in &view.instructions {
                let _ = writeln!(out, "  - {}", line);
            }
            for entry in &view.categories {
                let mark = if entry.checked { "x" } else { " " };
                let lock = if entry.disabled { " (locked)" } else { "" };
                let _ = writeln!(out, "  [{}] {} ({}){}", mark, entry.label, entry.key, lock);
            }
            let _ = writeln!(out, "<enter> {}", ui.start);
        }
        Screen::Playing => {
            let _ = writeln!(out, "{}", ui.playing_label);
            if let Some(ref image) = view.decoration {
                let _ = writeln!(out, "  ({})", image);
            }
            let _ = writeln!(out, "<enter> {}", ui.stop);
        }
        Screen::Prompt => {
            if let Some(ref image) = view.decoration {
                let _ = writeln!(out, "  ({})", image);
            }
            if let Some(ref prompt) = view.prompt {
                let _ = writeln!(out, ">> {}", prompt.text);
                if !prompt.category_caption.is_empty() {
                    let _ = writeln!(out, "   {}", prompt.category_caption);
                }
            }
            let _ = writeln!(out, "<enter> {}   skip: {}", ui.next_round, ui.skip);
        }
    }

    if view.support_open {
        let _ = writeln!(out, "-- {} --", ui.support_title);
        let _ = writeln!(out, "{}   close: {}", ui.support, ui.close);
    }
    if let Some(ref announcement) = view.announcement {
        let _ = writeln!(out, "* {}", announcement);
    }
    out
}
