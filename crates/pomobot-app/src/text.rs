//! Chat markdown formatting helpers shared by the command services.

/// Fenced code block in the platform's chat markdown.
pub fn code_block(lang: &str, value: &str) -> String {
    format!("```{lang}\n{value}```")
}

/// Help text: a description line, then each command and its explanation
/// as a bullet, with commands padded to equal width inside inline code.
pub fn help_list(desc: &str, items: &[(&str, &str)]) -> String {
    let pad = items.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let body = items
        .iter()
        .map(|(key, value)| format!("_**`{key:<pad$}`**_ - {value}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{desc}\n\n{body}")
}

/// A header line followed by bold-titled entries.
pub fn markdown_list(header: &str, items: &[(String, String)]) -> String {
    let body = items
        .iter()
        .map(|(title, value)| format!("**{title}**\n{value}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{header}\n{body}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_block_wraps_with_language() {
        assert_eq!(code_block("md", "hello\n"), "```md\nhello\n```");
    }

    #[test]
    fn help_list_pads_commands_to_equal_width() {
        let text = help_list(
            "The commands:",
            &[("!memo.set hoge foo", "sets"), ("!memo.get", "gets")],
        );
        assert!(text.starts_with("The commands:\n\n"));
        assert!(text.contains("_**`!memo.set hoge foo`**_ - sets"));
        // Shorter command padded to the longest one's width.
        assert!(text.contains("_**`!memo.get         `**_ - gets"));
    }

    #[test]
    fn help_list_with_single_item() {
        let text = help_list("desc", &[("!wiki hoge", "looks up")]);
        assert!(text.contains("`!wiki hoge`"));
    }

    #[test]
    fn markdown_list_joins_titled_entries() {
        let items = vec![
            ("Alpha".to_string(), "first".to_string()),
            ("Beta".to_string(), "second".to_string()),
        ];
        let text = markdown_list("<link>", &items);
        assert_eq!(text, "<link>\n**Alpha**\nfirst\n**Beta**\nsecond");
    }
}
