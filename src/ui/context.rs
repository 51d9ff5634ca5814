//! Terminal capability detection

use std::io::IsTerminal;

/// Variables set by common CI providers
const CI_MARKERS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
    "BUILDKITE",
    "TEAMCITY_VERSION",
    "TF_BUILD",
];

/// Whether live spinners and styled markers may be drawn
#[derive(Debug, Clone)]
pub struct UiContext {
    interactive: bool,
}

impl UiContext {
    /// Interactive only when stdout is a TTY outside CI
    pub fn detect() -> Self {
        let in_ci = CI_MARKERS.iter().any(|var| std::env::var_os(var).is_some());
        Self {
            interactive: std::io::stdout().is_terminal() && !in_ci,
        }
    }

    /// Plain output, for tests and piped runs
    pub fn non_interactive() -> Self {
        Self { interactive: false }
    }

    /// Spinners and unicode step markers
    pub fn use_fancy_output(&self) -> bool {
        self.interactive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_interactive_is_plain() {
        let ctx = UiContext::non_interactive();
        assert!(!ctx.use_fancy_output());
    }

    #[test]
    #[serial_test::serial]
    fn ci_marker_disables_fancy_output() {
        let previous = std::env::var_os("CI");
        std::env::set_var("CI", "true");
        let ctx = UiContext::detect();
        match previous {
            Some(value) => std::env::set_var("CI", value),
            None => std::env::remove_var("CI"),
        }
        assert!(!ctx.use_fancy_output());
    }
}
