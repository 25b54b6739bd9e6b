// Execution engine for translated scripts

use crate::interpreter::capture::OutputLog;
use crate::interpreter::environment::Environment;
use crate::interpreter::errors::RuntimeFault;
use crate::parser::ast::SourceLocation;
use crate::translator::{Mutability, Script, Stmt};
use log::{debug, warn};

/// How a statement finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ControlFlow {
    Normal,
    Break,
    Continue,
}

/// Tree-walking interpreter over a [`Script`]
///
/// Each sandbox owns its scope stack and output log; nothing is shared
/// between runs.
pub struct Sandbox {
    pub(crate) env: Environment,
    pub(crate) log: OutputLog,
    /// Location of the statement being executed, for diagnostics
    pub(crate) current_location: SourceLocation,
}

impl Sandbox {
    pub fn new() -> Self {
        Sandbox {
            env: Environment::new(),
            log: OutputLog::new(),
            current_location: SourceLocation::default(),
        }
    }

    /// Run `script` in a fresh sandbox and return its log.
    pub fn execute(script: &Script) -> String {
        let mut sandbox = Sandbox::new();
        sandbox.run(script);
        sandbox.into_log().into_text()
    }

    /// Run every top-level statement. A fault that escapes a statement ends
    /// the run and becomes the last log line.
    pub fn run(&mut self, script: &Script) {
        debug!("executing {} top-level statements", script.body.len());
        if let Err(fault) = self.execute_statements(&script.body) {
            warn!(
                "execution stopped at line {}, column {}: {}",
                self.current_location.line, self.current_location.column, fault
            );
            self.log
                .push(format!("Execution Error: {}: {}", fault.class(), fault));
        }
    }

    pub fn log(&self) -> &OutputLog {
        &self.log
    }

    pub fn into_log(self) -> OutputLog {
        self.log
    }

    /// Executes statements in order until one of them breaks or continues.
    pub(crate) fn execute_statements(&mut self, body: &[Stmt]) -> Result<ControlFlow, RuntimeFault> {
        for stmt in body {
            let flow = self.execute_statement(stmt)?;
            if flow != ControlFlow::Normal {
                return Ok(flow);
            }
        }
        Ok(ControlFlow::Normal)
    }

    /// Executes `body` inside a fresh scope.
    pub(crate) fn execute_block(&mut self, body: &[Stmt]) -> Result<ControlFlow, RuntimeFault> {
        self.env.push_scope();
        let flow = self.execute_statements(body);
        self.env.pop_scope();
        flow
    }

    pub(crate) fn execute_statement(&mut self, stmt: &Stmt) -> Result<ControlFlow, RuntimeFault> {
        if let Some(location) = stmt.location() {
            self.current_location = location;
        }

        match stmt {
            Stmt::Declare {
                name,
                mutability,
                init,
                ..
            } => {
                let value = self.evaluate(init)?;
                self.env
                    .declare(name, value, *mutability == Mutability::Mutable)?;
            }

            Stmt::Assign { name, value, .. } => {
                let value = self.evaluate(value)?;
                self.env.assign(name, value)?;
            }

            Stmt::Capture { args, .. } => {
                let outcome = args
                    .iter()
                    .map(|arg| self.evaluate(arg))
                    .collect::<Result<Vec<_>, _>>();
                self.log.capture(outcome);
            }

            Stmt::If {
                branches,
                otherwise,
                ..
            } => {
                for branch in branches {
                    if self.evaluate(&branch.condition)?.is_truthy() {
                        return self.execute_block(&branch.body);
                    }
                }
                if let Some(body) = otherwise {
                    return self.execute_block(body);
                }
            }

            Stmt::Loop(lp) => self.execute_loop(lp)?,

            Stmt::Break => return Ok(ControlFlow::Break),

            Stmt::Continue => return Ok(ControlFlow::Continue),

            Stmt::Eval { expr, .. } => {
                self.evaluate(expr)?;
            }
        }

        Ok(ControlFlow::Normal)
    }
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;
    use crate::parser::parse::parse;
    use crate::translator::translate;

    fn run_body(body: &str) -> String {
        let source = format!("arambha systummm\n{}\nbihari_sramik", body);
        let script = translate(&parse(tokenize(&source).unwrap()).unwrap()).unwrap();
        Sandbox::execute(&script)
    }

    #[test]
    fn test_sequential_assignment() {
        assert_eq!(
            run_body("ghoshit_kar a = 10; prakashit_kar(a); a = 20; prakashit_kar(a);"),
            "10\n20"
        );
    }

    #[test]
    fn test_if_chain_runs_only_else() {
        let output = run_body(
            "ghoshit_kar a = 1; ghoshit_kar b = 2;
             yadi (a > b) { prakashit_kar(\"greater\"); }
             anyatha_yadi (a == b) { prakashit_kar(\"equal\"); }
             anyatha { prakashit_kar(\"less\"); }",
        );
        assert_eq!(output, "less");
    }

    #[test]
    fn test_if_chain_first_true_branch_wins() {
        let output = run_body(
            "yadi (satya) { prakashit_kar(1); } anyatha_yadi (satya) { prakashit_kar(2); }",
        );
        assert_eq!(output, "1");
    }

    #[test]
    fn test_print_fault_is_recovered() {
        let output = run_body("prakashit_kar(missing); prakashit_kar(\"after\");");
        assert_eq!(output, "Error: missing is not defined\nafter");
    }

    #[test]
    fn test_fatal_fault_stops_execution() {
        let output = run_body("prakashit_kar(1); ghoshit_kar a = missing; prakashit_kar(2);");
        assert_eq!(output, "1\nExecution Error: ReferenceError: missing is not defined");
    }

    #[test]
    fn test_constant_assignment_is_fatal() {
        let output = run_body("nishchit_kar b = 20; b = 30; prakashit_kar(b);");
        assert_eq!(output, "Execution Error: TypeError: Assignment to constant variable.");
    }

    #[test]
    fn test_redeclaration_is_fatal() {
        let output = run_body("ghoshit_kar a = 1; ghoshit_kar a = 2;");
        assert_eq!(
            output,
            "Execution Error: SyntaxError: Identifier 'a' has already been declared"
        );
    }

    #[test]
    fn test_block_scope_shadowing() {
        let output = run_body(
            "ghoshit_kar a = 1; yadi (satya) { ghoshit_kar a = 2; prakashit_kar(a); } prakashit_kar(a);",
        );
        assert_eq!(output, "2\n1");
    }

    #[test]
    fn test_block_binding_not_visible_after_block() {
        let output = run_body("yadi (satya) { ghoshit_kar t = 1; } prakashit_kar(t);");
        assert_eq!(output, "Error: t is not defined");
    }

    #[test]
    fn test_print_joins_arguments_with_space() {
        let output = run_body("prakashit_kar(\"Loop count:\", 3, satya, chintan);");
        assert_eq!(output, "Loop count: 3 true null");
    }

    #[test]
    fn test_empty_program_has_empty_log() {
        assert_eq!(run_body(""), "");
    }

    #[test]
    fn test_sandbox_log_accessor() {
        let script = translate(
            &parse(tokenize("arambha systummm prakashit_kar(7) bihari_sramik").unwrap()).unwrap(),
        )
        .unwrap();
        let mut sandbox = Sandbox::new();
        sandbox.run(&script);
        assert_eq!(sandbox.log().lines(), &["7"]);
    }
}
