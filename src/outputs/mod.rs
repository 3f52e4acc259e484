//! Output generation.
//!
//! # Submodules
//!
//! - [`text`]: writes each matching article to a `.txt` file in the dated
//!   output folder
//!
//! # Output Structure
//!
//! ```text
//! articles/                 # base directory (--output-dir)
//! ├── 20250505/
//! │   └── <title>.txt
//! └── 20250506/
//!     ├── <title>.txt
//!     └── <title>.txt
//! ```

pub mod text;
