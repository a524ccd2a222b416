//! Line-oriented checks over route, page and server source files.
//!
//! Matching is purely textual. Lines inside comments or string literals
//! are not masked, so these rules over-report rather than miss a call site.

use crate::models::{Finding, Group, Location, ScanTarget, Severity};
use regex::Regex;
use std::sync::LazyLock;

pub const ASYNC_PARAMS_TYPE: &str = "async-params-type";
pub const PARAMS_AWAIT: &str = "params-await";
pub const REQUEST_API_AWAIT: &str = "request-api-await";
pub const REVALIDATE_TAG_PROFILE: &str = "revalidate-tag-profile";

/// Props that became `Promise`s.
const ASYNC_PROPS: &[&str] = &["params", "searchParams"];
/// Keywords that mark a line as a declaration worth checking.
const DECLARATION_HINTS: &[&str] = &["export", "function", "const"];
/// Request-scoped accessors that became async.
const REQUEST_APIS: &[&str] = &["cookies", "headers", "draftMode"];

static PARAMS_ACCESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"params\.(\w+)").expect("params access regex"));

fn finding(
    target: &ScanTarget,
    rule: &'static str,
    severity: Severity,
    line: usize,
    message: String,
) -> Finding {
    Finding {
        rule,
        group: Group::Source,
        severity,
        location: Location::line(target.rel.clone(), line as u32),
        message,
    }
}

/// `params:` / `searchParams:` declared without a `Promise<...>` type.
pub fn check_async_params_type(target: &ScanTarget, content: &str) -> Vec<Finding> {
    let mut out = Vec::new();
    for (i, line) in content.lines().enumerate() {
        if line.contains("Promise<") || !DECLARATION_HINTS.iter().any(|k| line.contains(k)) {
            continue;
        }
        for prop in ASYNC_PROPS {
            if line.contains(&format!("{}:", prop)) {
                out.push(finding(
                    target,
                    ASYNC_PARAMS_TYPE,
                    Severity::Error,
                    i + 1,
                    format!("{} should be Promise<...>", prop),
                ));
            }
        }
    }
    out
}

/// `params.<field>` read on a line that does not await `params`.
pub fn check_params_await(target: &ScanTarget, content: &str) -> Vec<Finding> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.contains("await params"))
        .filter_map(|(i, line)| {
            let caps = PARAMS_ACCESS_RE.captures(line)?;
            Some(finding(
                target,
                PARAMS_AWAIT,
                Severity::Error,
                i + 1,
                format!(
                    "params must be awaited before access (params.{})",
                    &caps[1]
                ),
            ))
        })
        .collect()
}

/// `cookies()`, `headers()` or `draftMode()` called without `await` on the same line.
pub fn check_request_api_await(target: &ScanTarget, content: &str) -> Vec<Finding> {
    let mut out = Vec::new();
    for (i, line) in content.lines().enumerate() {
        for api in REQUEST_APIS {
            let call = format!("{}()", api);
            if line.contains(&call) && !line.contains(&format!("await {}", call)) {
                out.push(finding(
                    target,
                    REQUEST_API_AWAIT,
                    Severity::Error,
                    i + 1,
                    format!("{} must be awaited", call),
                ));
            }
        }
    }
    out
}

/// `revalidateTag(...)` with a single argument.
pub fn check_revalidate_tag(target: &ScanTarget, content: &str) -> Vec<Finding> {
    const CALL: &str = "revalidateTag(";
    let mut out = Vec::new();
    for (i, line) in content.lines().enumerate() {
        for (pos, _) in line.match_indices(CALL) {
            if count_call_args(&line[pos + CALL.len()..]) == Some(1) {
                out.push(finding(
                    target,
                    REVALIDATE_TAG_PROFILE,
                    Severity::Warning,
                    i + 1,
                    "revalidateTag() requires second argument (cacheLife profile)".to_string(),
                ));
            }
        }
    }
    out
}

/// Count top-level arguments of a call whose opening paren was just consumed.
///
/// Returns `None` when the argument list does not close within `rest`.
/// Nested brackets and quoted strings are skipped; escapes inside strings
/// are honored.
pub fn count_call_args(rest: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut commas = 0usize;
    let mut seen_arg = false;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for c in rest.chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => {
                quote = Some(c);
                seen_arg = true;
            }
            '(' | '[' | '{' => {
                depth += 1;
                seen_arg = true;
            }
            ')' | ']' | '}' if depth > 0 => depth -= 1,
            ')' => return Some(if seen_arg { commas + 1 } else { commas }),
            ',' if depth == 0 => {
                commas += 1;
                seen_arg = false;
            }
            c if c.is_whitespace() => {}
            _ => seen_arg = true,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn target() -> ScanTarget {
        ScanTarget {
            path: PathBuf::from("/p/app/blog/[slug]/page.tsx"),
            rel: "app/blog/[slug]/page.tsx".into(),
            ext: "tsx".into(),
        }
    }

    #[test]
    fn test_route_handler_with_sync_params_is_error() {
        let src = "export async function GET(req: Request, { params: { id } }) {\n  return Response.json({ id })\n}\n";
        let found = check_async_params_type(&target(), src);
        assert!(!found.is_empty());
        assert!(found.iter().all(|f| f.severity == Severity::Error));
        assert_eq!(found[0].location.line, Some(1));
        assert_eq!(found[0].location.path, "app/blog/[slug]/page.tsx");
    }

    #[test]
    fn test_promise_typed_params_are_clean() {
        let src = "export default async function Page({ params }: { params: Promise<{ slug: string }> }) {}\n";
        assert!(check_async_params_type(&target(), src).is_empty());
    }

    #[test]
    fn test_params_and_search_params_reported_separately() {
        let src = "export default function Page({ params, searchParams }: { params: { a: string }; searchParams: { q?: string } }) {}";
        let found = check_async_params_type(&target(), src);
        assert_eq!(found.len(), 2);
        assert!(found[0].message.starts_with("params"));
        assert!(found[1].message.starts_with("searchParams"));
    }

    #[test]
    fn test_params_type_needs_declaration_hint() {
        let src = "  params: { slug: string }\n";
        assert!(check_async_params_type(&target(), src).is_empty());
    }

    #[test]
    fn test_params_access_without_await() {
        let src = "const slug = params.slug\nconst { id } = await params\nconst x = (await params).id\n";
        let found = check_params_await(&target(), src);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].location.line, Some(1));
        assert!(found[0].message.contains("params.slug"));
    }

    #[test]
    fn test_awaited_headers_is_clean() {
        let src = "const headers = await headers()\n";
        assert!(check_request_api_await(&target(), src).is_empty());
    }

    #[test]
    fn test_unawaited_headers_is_one_error() {
        let src = "const h = headers()\n";
        let found = check_request_api_await(&target(), src);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].severity, Severity::Error);
        assert_eq!(found[0].message, "headers() must be awaited");
    }

    #[test]
    fn test_each_request_api_reported() {
        let src = "const c = cookies(); const d = draftMode()\nconst h = await headers()\n";
        let found = check_request_api_await(&target(), src);
        let msgs: Vec<_> = found.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(msgs, vec!["cookies() must be awaited", "draftMode() must be awaited"]);
        assert!(found.iter().all(|f| f.location.line == Some(1)));
    }

    #[test]
    fn test_revalidate_tag_single_argument_warns() {
        let found = check_revalidate_tag(&target(), "revalidateTag('posts')\n");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].severity, Severity::Warning);
    }

    #[test]
    fn test_revalidate_tag_trailing_comma_still_one_argument() {
        let found = check_revalidate_tag(&target(), "revalidateTag('posts',)\n");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].severity, Severity::Warning);
        assert!(check_revalidate_tag(&target(), "revalidateTag('posts', 'max',)\n").is_empty());
    }

    #[test]
    fn test_revalidate_tag_with_profile_is_clean() {
        assert!(check_revalidate_tag(&target(), "revalidateTag('posts', profile)\n").is_empty());
        assert!(check_revalidate_tag(&target(), "revalidateTag(\n  'posts',\n  'max'\n)\n").is_empty());
    }

    #[test]
    fn test_revalidate_tag_with_variable_or_call_argument() {
        let src = "revalidateTag(tag)\nrevalidateTag(tagFor(id, 'x'))\nrevalidateTag(`post-${id}`, 'max')\n";
        let found = check_revalidate_tag(&target(), src);
        let lines: Vec<_> = found.iter().map(|f| f.location.line).collect();
        assert_eq!(lines, vec![Some(1), Some(2)]);
    }

    #[test]
    fn test_count_call_args() {
        assert_eq!(count_call_args(")"), Some(0));
        assert_eq!(count_call_args("'a')"), Some(1));
        assert_eq!(count_call_args("'a,b', c)"), Some(2));
        assert_eq!(count_call_args("{ a: 1, b: 2 })"), Some(1));
        assert_eq!(count_call_args("'it\\'s')"), Some(1));
        assert_eq!(count_call_args("'a',)"), Some(1));
        assert_eq!(count_call_args("'a', 'max',)"), Some(2));
        assert_eq!(count_call_args("'a',"), None);
    }
}
