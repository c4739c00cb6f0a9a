//! Verb dispatch.
//!
//! A `Call` names a verb and carries the already-evaluated arguments; the
//! `Dispatcher` routes it to one handler and answers with a fresh `Outcome`.
//! Calls are never mutated, so consumed arguments cannot leak into results.

mod archive;
pub(crate) mod args;
mod execute;
mod file;
mod folder;
mod path;
pub mod registry;
mod stream;
pub mod verb;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::errors::Result;
use crate::node::{Node, Value};
use crate::resolve::RootResolver;
use crate::services::Services;

pub use execute::Evaluator;
pub use registry::StreamRegistry;
pub use verb::{Invocation, Verb};

/// One verb invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub verb: Verb,
    pub value: Option<Value>,
    pub children: Vec<Node>,
}

impl Call {
    pub fn new(verb: Verb) -> Self {
        Self {
            verb,
            value: None,
            children: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Named argument, e.g. `overwrite` or `display-hidden`.
    pub fn with_arg(self, name: &str, value: impl Into<Value>) -> Self {
        self.with_child(Node::new(name).with_value(value))
    }
}

/// Result of a verb: a value and/or result children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub value: Option<Value>,
    pub children: Vec<Node>,
}

impl Outcome {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn value(value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            children: Vec::new(),
        }
    }

    /// Unnamed leaves, one per entry.
    pub fn list<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Value>,
    {
        Self {
            value: None,
            children: entries.into_iter().map(|e| Node::leaf(e)).collect(),
        }
    }

    /// String values of the result children, in order.
    pub fn entries(&self) -> Vec<&str> {
        self.children.iter().filter_map(Node::value_str).collect()
    }
}

/// Routes calls to handlers, holding the root, the services and open streams.
pub struct Dispatcher {
    root: RootResolver,
    services: Services,
    streams: StreamRegistry,
    evaluator: Option<Arc<dyn Evaluator>>,
}

impl Dispatcher {
    pub fn new(root: RootResolver, services: Services) -> Self {
        Self {
            root,
            services,
            streams: StreamRegistry::new(),
            evaluator: None,
        }
    }

    /// Dispatcher over the local filesystem.
    pub fn local(root: RootResolver) -> Self {
        Self::new(root, Services::local())
    }

    /// Enable `file.execute` by plugging in the host's evaluator.
    pub fn with_evaluator(mut self, evaluator: Arc<dyn Evaluator>) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    pub fn root(&self) -> &RootResolver {
        &self.root
    }

    pub fn streams(&self) -> &StreamRegistry {
        &self.streams
    }

    pub(crate) fn services(&self) -> &Services {
        &self.services
    }

    pub(crate) fn evaluator(&self) -> Option<&Arc<dyn Evaluator>> {
        self.evaluator.as_ref()
    }

    /// Host-relative form of an absolute path produced by a service.
    pub(crate) fn relative(&self, absolute: &Path) -> String {
        self.root.relative_path(&absolute.to_string_lossy())
    }

    /// Listing result: relative paths in service order, dot-entries dropped
    /// unless `show_hidden`, folders suffixed with `/`.
    pub(crate) fn listing(&self, paths: Vec<PathBuf>, show_hidden: bool, folders: bool) -> Outcome {
        let entries = paths
            .into_iter()
            .filter(|p| {
                show_hidden
                    || !p
                        .file_name()
                        .is_some_and(|n| n.to_string_lossy().starts_with('.'))
            })
            .map(|p| {
                let rel = self.relative(&p);
                if folders { format!("{rel}/") } else { rel }
            });
        Outcome::list(entries)
    }

    /// Run `call` on the blocking path.
    pub fn invoke(&self, call: Call) -> Result<Outcome> {
        debug!(verb = %call.verb, "invoke");
        match call.verb {
            Verb::FileSave => file::save(self, &call),
            Verb::FileSaveBinary => file::save_binary(self, &call),
            Verb::FileLoad => file::load(self, &call),
            Verb::FileLoadBinary => file::load_binary(self, &call),
            Verb::FileCopy => file::copy(self, &call),
            Verb::FileMove => file::move_to(self, &call),
            Verb::FileDelete => file::delete(self, &call),
            Verb::FileExists => file::exists(self, &call),
            Verb::FileList => file::list(self, &call, false),
            Verb::FileListRecursively => file::list(self, &call, true),
            Verb::FileExecute => execute::execute(self, call),
            Verb::FileUnzip => archive::unzip(self, &call),
            Verb::FolderCreate => folder::create(self, &call),
            Verb::FolderCopy => folder::copy(self, &call),
            Verb::FolderMove => folder::move_to(self, &call),
            Verb::FolderDelete => folder::delete(self, &call),
            Verb::FolderExists => folder::exists(self, &call),
            Verb::FolderList => folder::list(self, &call, false),
            Verb::FolderListRecursively => folder::list(self, &call, true),
            Verb::FolderRoot => path::root_folder(self),
            Verb::PathGetFolder => path::get_folder(&call),
            Verb::StreamOpenFile => stream::open_file(self, &call),
            Verb::StreamSaveFile => stream::save_file(self, &call),
            Verb::StreamRead | Verb::StreamLoad => stream::read(self, &call),
            Verb::StreamClose => stream::close(self, &call),
            Verb::ContentZip | Verb::ContentZipStream => archive::zip(self, &call),
        }
    }

    /// Run `call` on the async path. Semantics match `invoke`.
    pub async fn invoke_async(&self, call: Call) -> Result<Outcome> {
        debug!(verb = %call.verb, "invoke_async");
        match call.verb {
            Verb::FileSave => file::save_async(self, &call).await,
            Verb::FileSaveBinary => file::save_binary_async(self, &call).await,
            Verb::FileLoad => file::load_async(self, &call).await,
            Verb::FileLoadBinary => file::load_binary_async(self, &call).await,
            Verb::FileCopy => file::copy_async(self, &call).await,
            Verb::FileMove => file::move_to_async(self, &call).await,
            Verb::FileDelete => file::delete_async(self, &call).await,
            Verb::FileExists => file::exists_async(self, &call).await,
            Verb::FileList => file::list_async(self, &call, false).await,
            Verb::FileListRecursively => file::list_async(self, &call, true).await,
            Verb::FileExecute => execute::execute_async(self, call).await,
            Verb::FileUnzip => archive::unzip_async(self, &call).await,
            Verb::FolderCreate => folder::create_async(self, &call).await,
            Verb::FolderCopy => folder::copy_async(self, &call).await,
            Verb::FolderMove => folder::move_to_async(self, &call).await,
            Verb::FolderDelete => folder::delete_async(self, &call).await,
            Verb::FolderExists => folder::exists_async(self, &call).await,
            Verb::FolderList => folder::list_async(self, &call, false).await,
            Verb::FolderListRecursively => folder::list_async(self, &call, true).await,
            Verb::FolderRoot => path::root_folder(self),
            Verb::PathGetFolder => path::get_folder(&call),
            Verb::StreamOpenFile => stream::open_file_async(self, &call).await,
            Verb::StreamSaveFile => stream::save_file_async(self, &call).await,
            Verb::StreamRead | Verb::StreamLoad => stream::read_async(self, &call).await,
            Verb::StreamClose => stream::close(self, &call),
            Verb::ContentZip | Verb::ContentZipStream => archive::zip(self, &call),
        }
    }

    /// Parse `invocation` (honouring a `wait.` prefix) and run it on the
    /// matching path.
    pub async fn invoke_named(&self, invocation: &str, call: Call) -> Result<Outcome> {
        let inv = Invocation::parse(invocation)?;
        let call = Call { verb: inv.verb, ..call };
        if inv.wait {
            self.invoke_async(call).await
        } else {
            self.invoke(call)
        }
    }
}
