//! The fixed command sequence run inside the project root.

use std::fmt;

/// One external command: a program and its argv.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ToolCommand {
    /// Build a command from a program name and whitespace-separated arguments.
    pub fn new(program: &str, args: &str) -> Self {
        Self {
            program: program.to_string(),
            args: args.split_whitespace().map(str::to_string).collect(),
        }
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Ordered commands for one run: version, tidy, fmt, test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPlan {
    pub commands: Vec<ToolCommand>,
}

impl CommandPlan {
    /// Plan for `tool` with `test_args` appended to the final `test` command.
    pub fn new(tool: &str, test_args: &str) -> Self {
        Self {
            commands: vec![
                ToolCommand::new(tool, "version"),
                ToolCommand::new(tool, "mod tidy"),
                ToolCommand::new(tool, "fmt ./..."),
                ToolCommand::new(tool, &format!("test {test_args}")),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::args::DEFAULT_TEST_ARGS;

    #[test]
    fn plan_runs_fixed_sequence_in_order() {
        let plan = CommandPlan::new("go", DEFAULT_TEST_ARGS);
        let rendered: Vec<String> = plan.commands.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "go version",
                "go mod tidy",
                "go fmt ./...",
                "go test -coverprofile=/tmp/coverage.out -short -timeout=10s ./...",
            ]
        );
    }

    #[test]
    fn test_command_carries_resolved_args() {
        let plan = CommandPlan::new("go", "-run TestFoo");
        let test = &plan.commands[3];
        assert_eq!(test.to_string(), "go test -run TestFoo");
        assert_eq!(test.program, "go");
        assert_eq!(test.args, vec!["test", "-run", "TestFoo"]);
    }

    #[test]
    fn extra_whitespace_does_not_produce_empty_args() {
        let command = ToolCommand::new("go", "  fmt   ./... ");
        assert_eq!(command.args, vec!["fmt", "./..."]);
    }
}
