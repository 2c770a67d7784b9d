/// Replace `{name}` tokens in `template` with the matching value from
/// `args`, in a single pass.
///
/// Unknown tokens and unbalanced braces are copied through untouched, and
/// substituted values are never rescanned.
pub fn fill(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find(['{', '}']) else {
            out.push_str(&rest[open..]);
            return out;
        };
        if after.as_bytes()[close] == b'{' {
            // A second `{` before any `}`: keep the first literally and retry from the second.
            out.push_str(&rest[open..open + 1 + close]);
            rest = &after[close..];
            continue;
        }
        let name = &after[..close];
        match args.iter().find(|(arg, _)| *arg == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[open..open + close + 2]),
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}
