//! Path resolution: pure string helpers plus the root folder every relative
//! path is interpreted against.

pub mod path;
pub mod root;

pub use path::{collapse_dots, combine_paths, escapes_root, file_name, get_folder, normalize};
pub use root::RootResolver;
