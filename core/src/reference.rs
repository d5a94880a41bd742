use std::path::Component;
use std::path::Path;

/// Path of `image_path` relative to the directory containing `document_path`,
/// with `/` separators and spaces percent-encoded.
pub fn relative_reference_path(document_path: &Path, image_path: &Path) -> String {
    let base = document_path.parent().unwrap_or_else(|| Path::new(""));
    let relative =
        pathdiff::diff_paths(image_path, base).unwrap_or_else(|| image_path.to_path_buf());

    let mut parts: Vec<String> = Vec::new();
    for component in relative.components() {
        match component {
            Component::RootDir => parts.push(String::new()),
            Component::CurDir => {}
            Component::ParentDir => parts.push("..".to_string()),
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::Prefix(prefix) => {
                parts.push(prefix.as_os_str().to_string_lossy().into_owned());
            }
        }
    }

    parts.join("/").replace(' ', "%20")
}

/// Markdown image reference, terminated by a newline.
pub fn format_reference(relative_path: &str) -> String {
    format!("![image]({relative_path})\n")
}
