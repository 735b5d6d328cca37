//! Plain-text rendering of guard results.

use std::fmt::Write;

use lmguard_core::{Availability, GuardSettings, TokenUsageInfo};

/// `key = value` lines describing the probed tier and active settings.
pub fn render_availability(availability: Availability, settings: &GuardSettings) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "availability = {availability}");
    let _ = writeln!(out, "needs_download = {}", availability.needs_download());
    let _ = writeln!(out, "download_policy = {}", settings.download_policy);
    match settings.default_prompt_timeout_ms {
        Some(ms) => {
            let _ = writeln!(out, "prompt_timeout_ms = {ms}");
        }
        None => {
            let _ = writeln!(out, "prompt_timeout_ms = none");
        }
    }
    out
}

pub fn render_token_usage(info: &TokenUsageInfo) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "prompt_tokens    = {}", info.prompt_tokens);
    let _ = writeln!(out, "tokens_so_far    = {}", info.tokens_so_far);
    let _ = writeln!(out, "tokens_available = {}", info.tokens_available);
    let _ = writeln!(out, "max_tokens       = {}", info.max_tokens);
    let _ = writeln!(out, "will_fit         = {}", info.will_fit);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_availability() {
        let text = render_availability(Availability::Downloadable, &GuardSettings::default());
        assert!(text.contains("availability = downloadable"));
        assert!(text.contains("needs_download = true"));
        assert!(text.contains("prompt_timeout_ms = none"));
    }

    #[test]
    fn test_render_token_usage() {
        let text = render_token_usage(&TokenUsageInfo::new(4, 10, 8));
        assert!(text.contains("tokens_available = 2"));
        assert!(text.contains("will_fit         = false"));
    }
}
