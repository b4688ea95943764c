use crate::e_parser::ParseOptions;
use crate::e_types::{Diagnostic, StrategyKind};
use std::fmt;

/// A parse strategy: a pure function from the full line sequence to diagnostics.
pub type StrategyFn = Box<dyn Fn(&[&str], &ParseOptions) -> Vec<Diagnostic> + Send + Sync>;

/// A kind-strategy pair.
pub struct StrategyCallback {
    pub kind: StrategyKind,
    pub strategy: StrategyFn,
}

impl fmt::Debug for StrategyCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyCallback")
            .field("kind", &self.kind)
            .field("strategy", &"Closure")
            .finish()
    }
}

/// An ordered chain of strategies where the first non-empty result wins.
///
/// The dispatcher holds no state besides the strategies themselves, so one
/// instance can serve any number of parses.
#[derive(Debug, Default)]
pub struct StrategyDispatcher {
    strategies: Vec<StrategyCallback>,
}

impl StrategyDispatcher {
    pub fn new() -> Self {
        StrategyDispatcher {
            strategies: Vec::new(),
        }
    }

    /// Test blocks first, then bare panics, then plain build errors.
    pub fn with_default_strategies() -> Self {
        let mut dispatcher = StrategyDispatcher::new();
        dispatcher.add_strategy(
            StrategyKind::TestBlock,
            Box::new(crate::e_test_block::parse_test_blocks),
        );
        dispatcher.add_strategy(
            StrategyKind::BarePanic,
            Box::new(crate::e_bare_panic::parse_bare_panic),
        );
        dispatcher.add_strategy(
            StrategyKind::BuildError,
            Box::new(crate::e_build_error::parse_build_errors),
        );
        dispatcher
    }

    /// Appends a strategy; it runs after every strategy added before it.
    pub fn add_strategy(&mut self, kind: StrategyKind, strategy: StrategyFn) {
        self.strategies.push(StrategyCallback { kind, strategy });
    }

    pub fn kinds(&self) -> Vec<StrategyKind> {
        self.strategies.iter().map(|s| s.kind).collect()
    }

    /// Runs the strategies in order and returns the first non-empty result.
    pub fn dispatch(
        &self,
        lines: &[&str],
        options: &ParseOptions,
    ) -> Option<(StrategyKind, Vec<Diagnostic>)> {
        for cb in &self.strategies {
            let diagnostics = (cb.strategy)(lines, options);
            log::debug!("{} strategy: {} diagnostics", cb.kind, diagnostics.len());
            if !diagnostics.is_empty() {
                return Some((cb.kind, diagnostics));
            }
        }
        None
    }
}
