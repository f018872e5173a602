//! Extension to Markdown fence-tag mapping
//!
//! Maps file extensions to the language identifier placed after the
//! opening code fence. Unknown extensions get an untagged fence.

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;

/// Fence tags by lowercase file extension
static FENCE_TAGS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("rs", "rust"),
        ("go", "go"),
        ("py", "python"),
        ("pyw", "python"),
        ("pyi", "python"),
        ("js", "javascript"),
        ("jsx", "javascript"),
        ("mjs", "javascript"),
        ("cjs", "javascript"),
        ("ts", "typescript"),
        ("tsx", "typescript"),
        ("c", "c"),
        ("h", "c"),
        ("cpp", "cpp"),
        ("cxx", "cpp"),
        ("cc", "cpp"),
        ("hpp", "cpp"),
        ("hxx", "cpp"),
        ("hh", "cpp"),
        ("cs", "csharp"),
        ("java", "java"),
        ("kt", "kotlin"),
        ("kts", "kotlin"),
        ("swift", "swift"),
        ("rb", "ruby"),
        ("php", "php"),
        ("sh", "bash"),
        ("bash", "bash"),
        ("zsh", "bash"),
        ("fish", "fish"),
        ("md", "markdown"),
        ("json", "json"),
        ("yaml", "yaml"),
        ("yml", "yaml"),
        ("toml", "toml"),
        ("xml", "xml"),
        ("html", "html"),
        ("css", "css"),
        ("sql", "sql"),
        ("txt", "text"),
    ])
});

/// Best-effort fence tag for a path, from its extension.
///
/// Returns `None` when the extension is missing or not in the table.
pub fn fence_tag(path: &str) -> Option<&'static str> {
    let ext = Path::new(path).extension()?.to_str()?;
    FENCE_TAGS.get(ext.to_lowercase().as_str()).copied()
}
