//! `file.execute`: load a source file and hand it to the host evaluator.

use async_trait::async_trait;
use std::path::Path;
use tracing::info;

use crate::errors::{Result, SlotIoError};
use crate::node::Node;

use super::args::path_value;
use super::{Call, Dispatcher, Outcome};

const SLOT: &str = "file.execute";

/// The host's expression engine, as far as `file.execute` needs it.
///
/// `parse` turns source text into a lambda tree; `eval` runs it and returns
/// what the lambda produced. Failures should be reported as
/// `SlotIoError::Evaluation`.
#[async_trait]
pub trait Evaluator: Send + Sync {
    fn parse(&self, source: &str) -> Result<Node>;

    fn eval(&self, lambda: Node) -> Result<Outcome>;

    async fn eval_async(&self, lambda: Node) -> Result<Outcome> {
        self.eval(lambda)
    }
}

/// Parameterize a parsed lambda: any declared `.arguments` is replaced by the
/// caller's children (when there are any) and `.filename` is put first.
fn prepare(mut lambda: Node, filename: &str, arguments: Vec<Node>) -> Node {
    lambda.take_child(".arguments");
    if !arguments.is_empty() {
        let mut args = Node::new(".arguments");
        args.children = arguments;
        lambda.children.insert(0, args);
    }
    lambda
        .children
        .insert(0, Node::new(".filename").with_value(filename));
    lambda
}

fn evaluator(d: &Dispatcher) -> Result<&dyn Evaluator> {
    d.evaluator()
        .map(|e| e.as_ref())
        .ok_or_else(|| SlotIoError::invalid(SLOT, "no evaluator is configured"))
}

pub(super) fn execute(d: &Dispatcher, call: Call) -> Result<Outcome> {
    let eval = evaluator(d)?;
    let filename = path_value(&call, SLOT)?.to_string();
    let source = d.services().file.load(Path::new(&d.root().resolve(&filename)?))?;
    let lambda = prepare(eval.parse(&source)?, &filename, call.children);
    info!(file = %filename, "Executing file");
    eval.eval(lambda)
}

pub(super) async fn execute_async(d: &Dispatcher, call: Call) -> Result<Outcome> {
    let eval = evaluator(d)?;
    let filename = path_value(&call, SLOT)?.to_string();
    let path = d.root().resolve(&filename)?;
    let source = d.services().file.load_async(Path::new(&path)).await?;
    let lambda = prepare(eval.parse(&source)?, &filename, call.children);
    info!(file = %filename, "Executing file");
    eval.eval_async(lambda).await
}
