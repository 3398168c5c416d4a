//! Node label text.

/// Inserts line breaks into a module name.
///
/// A break goes after a `/` once the current line holds at least `wrap_at`
/// characters. Names without separators are never broken.
///
/// # Example
///
/// ```
/// use modscope::visual::wrap_module_name;
///
/// assert_eq!(
///     wrap_module_name("github.com/aws/aws-sdk-go-v2/service/s3", 15),
///     "github.com/aws/\naws-sdk-go-v2/service/\ns3"
/// );
/// ```
pub fn wrap_module_name(name: &str, wrap_at: usize) -> String {
    let mut wrapped = String::with_capacity(name.len() + name.len() / wrap_at.max(1));
    let mut line_length = 0;

    for c in name.chars() {
        wrapped.push(c);
        line_length += 1;
        if c == '/' && line_length >= wrap_at {
            wrapped.push('\n');
            line_length = 0;
        }
    }

    wrapped
}

/// Formats a line count as thousands of lines.
///
/// Large modules get whole numbers, small ones keep enough decimals to show
/// a non-zero figure.
///
/// # Example
///
/// ```
/// use modscope::visual::format_kloc;
///
/// assert_eq!(format_kloc(1), "0.001");
/// assert_eq!(format_kloc(2_460), "2.5");
/// assert_eq!(format_kloc(128_600), "129");
/// ```
pub fn format_kloc(lines: u64) -> String {
    let kloc = lines as f64 / 1000.0;
    if kloc >= 10.0 {
        format!("{}", kloc.round() as u64)
    } else if kloc >= 0.1 {
        format!("{:.1}", kloc)
    } else {
        format!("{:.3}", kloc)
    }
}

/// Builds the full node label: the wrapped name and a KLOC line.
pub fn node_label(name: &str, lines: u64, wrap_at: usize) -> String {
    format!("{}\n{}K LOC", wrap_module_name(name, wrap_at), format_kloc(lines))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_short_names_are_not_wrapped() {
        assert_eq!(wrap_module_name("stdlib", 15), "stdlib");
        assert_eq!(wrap_module_name("golang.org/x/net", 15), "golang.org/x/net");
    }

    #[test]
    fn test_break_only_after_separator() {
        assert_eq!(
            wrap_module_name("averyveryverylongsegment/x", 15),
            "averyveryverylongsegment/\nx"
        );
    }

    #[test]
    fn test_counter_resets_after_break() {
        assert_eq!(
            wrap_module_name("abcdefghijklmn/abcdefghijklmn/ab/c", 15),
            "abcdefghijklmn/\nabcdefghijklmn/\nab/c"
        );
    }

    #[test]
    fn test_trailing_separator() {
        assert_eq!(wrap_module_name("abcdefghijklmn/", 15), "abcdefghijklmn/\n");
    }

    #[test]
    fn test_format_kloc_ranges() {
        assert_eq!(format_kloc(0), "0.000");
        assert_eq!(format_kloc(99), "0.099");
        assert_eq!(format_kloc(100), "0.1");
        assert_eq!(format_kloc(9_940), "9.9");
        assert_eq!(format_kloc(10_000), "10");
        assert_eq!(format_kloc(10_499), "10");
        assert_eq!(format_kloc(10_500), "11");
    }

    #[test]
    fn test_node_label() {
        assert_eq!(node_label("stdlib", 1, 15), "stdlib\n0.001K LOC");
        assert_eq!(
            node_label("github.com/pkg/errors", 1_200, 15),
            "github.com/pkg/\nerrors\n1.2K LOC"
        );
    }

    proptest! {
        #[test]
        fn wrapping_only_inserts_breaks(name in "[a-z./-]{0,80}") {
            let wrapped = wrap_module_name(&name, 15);
            prop_assert_eq!(wrapped.replace('\n', ""), name);
        }

        #[test]
        fn wrapped_lines_break_at_first_late_separator(name in "[a-z./-]{0,80}", wrap_at in 1usize..30) {
            let wrapped = wrap_module_name(&name, wrap_at);
            let lines: Vec<&str> = wrapped.split('\n').collect();
            for (i, line) in lines.iter().enumerate() {
                let is_last = i + 1 == lines.len();
                if !is_last {
                    prop_assert!(line.ends_with('/'));
                    prop_assert!(line.chars().count() >= wrap_at);
                }
                // No separator at or past the threshold except the one that ended the line.
                for (pos, c) in line.chars().enumerate() {
                    if c == '/' && pos + 1 >= wrap_at {
                        prop_assert_eq!(pos + 1, line.chars().count());
                    }
                }
            }
        }
    }
}
