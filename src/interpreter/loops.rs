//! Guarded loop execution (`yatha`, `prati_ghatak`).
//!
//! Both loop forms run through one driver. The loop gets its own scope, so a
//! `prati_ghatak` initializer is visible only to its loop, and its own
//! iteration counter, created fresh every time the loop statement is entered.
//!
//! The counter is bumped after the condition holds and before the body runs;
//! the pass that pushes it past the guard's limit faults instead of running
//! the body, so exactly `limit` bodies can run.

use crate::interpreter::engine::{ControlFlow, Sandbox};
use crate::interpreter::errors::RuntimeFault;
use crate::translator::{GuardedLoop, Stmt};
use log::trace;

/// Result returned by [`Sandbox::execute_loop_body`] to signal how the body ended.
pub(crate) enum LoopBodyResult {
    /// Body completed normally or via `agla_ghaatak`; run the increment and iterate again.
    Continue,
    /// `viram` was encountered; the loop should exit cleanly.
    Break,
}

impl Sandbox {
    /// Executes all statements in `body` inside a fresh scope.
    pub(crate) fn execute_loop_body(&mut self, body: &[Stmt]) -> Result<LoopBodyResult, RuntimeFault> {
        match self.execute_block(body)? {
            ControlFlow::Break => Ok(LoopBodyResult::Break),
            ControlFlow::Continue | ControlFlow::Normal => Ok(LoopBodyResult::Continue),
        }
    }

    /// Executes a guarded loop inside its own scope.
    pub(crate) fn execute_loop(&mut self, lp: &GuardedLoop) -> Result<(), RuntimeFault> {
        self.env.push_scope();
        let result = self.drive_loop(lp);
        self.env.pop_scope();
        result
    }

    fn drive_loop(&mut self, lp: &GuardedLoop) -> Result<(), RuntimeFault> {
        if let Some(init) = &lp.init {
            self.execute_statement(init)?;
        }

        let mut iterations = 0usize;
        trace!("{} armed at line {}", lp.guard.name, lp.location.line);

        loop {
            if let Some(condition) = &lp.condition {
                self.current_location = lp.location;
                if !self.evaluate(condition)?.is_truthy() {
                    break;
                }
            }

            iterations += 1;
            if iterations > lp.guard.limit {
                return Err(RuntimeFault::IterationLimit {
                    guard: lp.guard.name.clone(),
                    limit: lp.guard.limit,
                });
            }

            match self.execute_loop_body(&lp.body)? {
                LoopBodyResult::Break => break,
                LoopBodyResult::Continue => {}
            }

            if let Some(increment) = &lp.increment {
                self.current_location = lp.location;
                self.evaluate(increment)?;
            }
        }

        trace!("{} released after {} iterations", lp.guard.name, iterations);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::engine::Sandbox;
    use crate::parser::lexer::tokenize;
    use crate::parser::parse::parse;
    use crate::translator::translate;

    fn run_body(body: &str) -> String {
        let source = format!("arambha systummm\n{}\nbihari_sramik", body);
        let script = translate(&parse(tokenize(&source).unwrap()).unwrap()).unwrap();
        Sandbox::execute(&script)
    }

    #[test]
    fn test_infinite_loop_runs_exactly_limit_bodies() {
        let output = run_body("ghoshit_kar n = 0; yatha (satya) { n = n + 1; prakashit_kar(n); }");
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 10_001);
        assert_eq!(lines[9_999], "10000");
        assert_eq!(
            lines[10_000],
            "Execution Error: Error: Loop iteration limit exceeded: more than 10000 iterations"
        );
    }

    #[test]
    fn test_guard_resets_on_each_entry() {
        // Two separate runs of the inner loop, each well within its own limit,
        // add up to more than one limit's worth of iterations.
        let output = run_body(
            "ghoshit_kar total = 0;
             prati_ghatak (ghoshit_kar r = 0; r < 2; r++) {
               prati_ghatak (ghoshit_kar i = 0; i < 6000; i++) { total = total + 1; }
             }
             prakashit_kar(total);",
        );
        assert_eq!(output, "12000");
    }

    #[test]
    fn test_for_loop_with_break() {
        let output = run_body(
            "prati_ghatak (ghoshit_kar i = 0; i < 5; i++) {
               prakashit_kar(\"Loop count:\", i);
               yadi (i == 2) { viram; }
             }",
        );
        assert_eq!(output, "Loop count: 0\nLoop count: 1\nLoop count: 2");
    }

    #[test]
    fn test_continue_in_for_still_increments() {
        let output = run_body(
            "prati_ghatak (ghoshit_kar i = 0; i < 4; i = i + 1) {
               yadi (i % 2 == 0) { agla_ghaatak; }
               prakashit_kar(i);
             }",
        );
        assert_eq!(output, "1\n3");
    }

    #[test]
    fn test_while_with_break_and_continue() {
        let output = run_body(
            "ghoshit_kar i = 0;
             yatha (i < 10) {
               i = i + 1;
               yadi (i == 3) { agla_ghaatak; }
               yadi (i == 8) { viram; }
               prakashit_kar(i);
             }",
        );
        assert_eq!(output, "1\n2\n4\n5\n6\n7");
    }

    #[test]
    fn test_for_binding_scoped_to_loop() {
        let output = run_body(
            "prati_ghatak (ghoshit_kar i = 0; i < 1; i++) { }
             prakashit_kar(i);",
        );
        assert_eq!(output, "Error: i is not defined");
    }

    #[test]
    fn test_for_loop_reenters_with_fresh_binding() {
        // The initializer declares again on every entry without a
        // redeclaration fault.
        let output = run_body(
            "ghoshit_kar k = 0;
             yatha (k < 2) {
               prati_ghatak (ghoshit_kar i = 0; i < 1; i++) { prakashit_kar(k, i); }
               k = k + 1;
             }",
        );
        assert_eq!(output, "0 0\n1 0");
    }

    #[test]
    fn test_fault_in_condition_is_fatal() {
        let output = run_body("yatha (missing < 3) { prakashit_kar(1); } prakashit_kar(2);");
        assert_eq!(output, "Execution Error: ReferenceError: missing is not defined");
    }

    #[test]
    fn test_empty_for_header_needs_break() {
        let output = run_body(
            "ghoshit_kar n = 0; prati_ghatak (;;) { n = n + 1; yadi (n == 3) { viram; } } prakashit_kar(n);",
        );
        assert_eq!(output, "3");
    }
}
