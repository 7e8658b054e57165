//! examgen-export: rendering generated exams to files.
//!
//! Plain text, `.docx`, HTML preview and the zip package that bundles exams
//! with their answer sheets. Also reads `.docx` input back to plain text so
//! it can be fed to the parser.

pub mod docx;
pub mod html;
pub mod package;
pub mod text;

pub use docx::{answer_sheet_to_docx, exam_to_docx, read_docx_text};
pub use package::{
    create_exam_package, package_file_name, package_preview, write_exam_package, NoopProgress,
    PackageProgress,
};
pub use text::{answer_sheet_text, exam_to_text, statistics_text};
