use glint_api::UniformType;
use lazy_regex::{lazy_regex, Captures, Lazy, Regex};

/// What the fake compiler keeps from a successfully compiled stage.
#[derive(Debug, Clone, Default)]
pub(crate) struct CompiledStage {
    pub has_main: bool,
    pub uniforms: Vec<(String, UniformType)>,
}

static MAIN_RE: Lazy<Regex> = lazy_regex!(r"\bvoid\s+main\s*\(\s*(void)?\s*\)");
static UNIFORM_RE: Lazy<Regex> = lazy_regex!(
    r"\buniform\s+(?:(?:lowp|mediump|highp)\s+)?(\w+)\s+(\w+(?:\s*,\s*\w+)*)\s*;"
);
static COMMENT_RE: Lazy<Regex> = lazy_regex!(r"(?s)/\*.*?\*/|//[^\n]*");

/// Blank out comments, keeping newlines so that reported lines and columns still match the source.
fn strip_comments(source: &str) -> String {
    COMMENT_RE
        .replace_all(source, |capture: &Captures| {
            capture[0]
                .chars()
                .map(|c| if c == '\n' { '\n' } else { ' ' })
                .collect::<String>()
        })
        .into_owned()
}

fn error_directive(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix("#error")?;
    (rest.is_empty() || rest.starts_with(char::is_whitespace)).then_some(rest)
}

/// Check `source` the way a (very forgiving) GLSL front-end would.
///
/// Errors are formatted like Mesa's info log lines: `0:<line>(<column>): error: <message>`.
pub(crate) fn compile(source: &str) -> Result<CompiledStage, String> {
    let code = strip_comments(source);
    let mut open: Vec<(char, usize, usize)> = Vec::new();
    let mut last_line = 1;

    for (line_idx, line) in code.lines().enumerate() {
        let line_no = line_idx + 1;
        last_line = line_no;

        if let Some(message) = error_directive(line) {
            return Err(format!("0:{line_no}(1): error: {}", message.trim()));
        }

        for (col_idx, c) in line.chars().enumerate() {
            let col = col_idx + 1;
            match c {
                '(' | '[' | '{' => open.push((c, line_no, col)),
                ')' | ']' | '}' => {
                    let expected = match c {
                        ')' => '(',
                        ']' => '[',
                        _ => '{',
                    };
                    match open.pop() {
                        Some((opener, ..)) if opener == expected => {}
                        _ => {
                            return Err(format!(
                                "0:{line_no}({col}): error: syntax error, unexpected '{c}'"
                            ))
                        }
                    }
                }
                _ => {}
            }
        }
    }

    if let Some((opener, line, col)) = open.pop() {
        return Err(format!(
            "0:{last_line}(1): error: syntax error, unexpected end of file, unclosed '{opener}' opened at {line}:{col}"
        ));
    }

    let uniforms = UNIFORM_RE
        .captures_iter(&code)
        .filter_map(|capture| {
            let ty = UniformType::from_glsl(capture.get(1)?.as_str())?;
            let names = capture.get(2)?.as_str().split(',');
            Some(names.map(move |name| (name.trim().to_string(), ty)))
        })
        .flatten()
        .collect();

    Ok(CompiledStage {
        has_main: MAIN_RE.is_match(&code),
        uniforms,
    })
}
