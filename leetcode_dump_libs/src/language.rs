use once_cell::sync::Lazy;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub code: &'static str,
    pub extension: &'static str,
    pub display: &'static str,
}

// Add new languages here.
static LANGUAGES: Lazy<HashMap<&'static str, Language>> = Lazy::new(|| {
    [
        ("c", "c", "C"),
        ("cpp", "cpp", "C++"),
        ("csharp", "cs", "C#"),
        ("java", "java", "Java"),
        ("javascript", "js", "JavaScript"),
        ("python", "py", "Python"),
        ("python3", "py", "Python3"),
        ("golang", "go", "Go"),
        ("mysql", "sql", "MySQL"),
    ]
    .into_iter()
    .map(|(code, extension, display)| {
        (
            code,
            Language {
                code,
                extension,
                display,
            },
        )
    })
    .collect()
});

/// Looks up a language by the code the site reports in `lang`.
pub fn lookup(code: &str) -> Option<&'static Language> {
    LANGUAGES.get(code)
}
