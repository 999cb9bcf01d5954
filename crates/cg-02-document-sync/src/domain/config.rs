/// How the document directory is enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanOptions {
    /// Descend into sub-directories. Document ids then carry the relative
    /// path with `/` separators.
    pub recursive: bool,
    /// Include dot-files and dot-directories.
    pub include_hidden: bool,
}
