//! Canned message bodies used to exercise the scrubbing service.
//!
//! Each template probes a different scrubbing case (plain text, trusted and
//! tampered URLs, callback numbers, OTP-looking content).

/// Template selected when none is configured.
pub const DEFAULT_TEMPLATE: &str = "SIMPLE MESSAGE";

/// Named message templates.
pub const TEMPLATES: &[(&str, &str)] = &[
    (
        "SIMPLE MESSAGE",
        "Thank you for showing interest, for more information please click on below link hello Sanjay",
    ),
    (
        "NORMAL URL",
        "Thank you for showing interest, for more information please click on below link http://urlmanager.duckdns.org/ Sanjay",
    ),
    (
        "TAMPERED MESSAGE",
        "Thank you for showing interest, for more information please click on below link http://urlmanager.duckdsn.org/ Sanjay",
    ),
    (
        "TRUSTED URL",
        "Thank you for showing interest, for more information please click on below link https://www.docker.com/ Sanjay",
    ),
    (
        "TRUSTED URL WITH EXTENSION",
        "Thank you for showing interest, for more information please click on below link https://www.docker.com/hello Sanjay",
    ),
    (
        "CALLBACK NUMBER",
        "Thank you for showing interest, for more information please click on below link 8459188977 Sanjay",
    ),
    (
        "OTP",
        "Thank you for showing interest, for more information please click on below link 123456 Sanjay",
    ),
];

/// Looks up a template body by name.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static str> {
    TEMPLATES
        .iter()
        .find(|(template, _)| *template == name)
        .map(|(_, body)| *body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_exists() {
        assert!(lookup(DEFAULT_TEMPLATE).is_some());
    }

    #[test]
    fn unknown_template_is_none() {
        assert!(lookup("NO SUCH TEMPLATE").is_none());
    }
}
