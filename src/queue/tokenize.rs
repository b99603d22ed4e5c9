use crate::imports::*;

use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "queue/command_line.pest"]
struct CommandLineParser;

/// Command word plus positional argument tokens. `command` is `None` for blank input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub command: Option<String>,
    pub args: Vec<String>,
}

#[tracing::instrument(err)]
pub fn tokenize(input: &str) -> Result<Vec<String>> {
    let mut pairs = CommandLineParser::parse(Rule::line, input).map_err(|err| {
        AssistantError::invalid_command(format!("can't read command line: {}", err.variant.message()))
    })?;
    let Some(line) = pairs.next() else {
        return Ok(Vec::new());
    };

    let mut tokens = Vec::new();
    for token in line.into_inner().filter(|pair| pair.as_rule() == Rule::token) {
        for part in token.into_inner() {
            let text = match part.as_rule() {
                Rule::double_quoted | Rule::single_quoted => part
                    .into_inner()
                    .next()
                    .map(|inner| inner.as_str())
                    .unwrap_or_default(),
                _ => part.as_str(),
            };
            tokens.push(text.to_string());
        }
    }
    Ok(tokens)
}

pub fn parse_line(input: &str) -> Result<ParsedLine> {
    let mut tokens = tokenize(input)?.into_iter();
    let command = tokens.next();
    Ok(ParsedLine {
        command,
        args: tokens.collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_words_split_like_whitespace() {
        let input = "  contact_add   Anna \t Kyiv ";
        assert_eq!(
            tokenize(input).unwrap(),
            input.split_whitespace().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_quoted_values_keep_spaces() {
        let parsed = parse_line(r#"contact_add "Anna Smith" 'Main st, 5' """#).unwrap();
        assert_eq!(parsed.command.as_deref(), Some("contact_add"));
        assert_eq!(parsed.args, vec!["Anna Smith", "Main st, 5", ""]);
    }

    #[test]
    fn test_blank_input_has_no_command() {
        let parsed = parse_line("   ").unwrap();
        assert_eq!(parsed.command, None);
        assert!(parsed.args.is_empty());
    }

    #[test]
    fn test_quotes_inside_words_stay_bare() {
        assert_eq!(tokenize("note_add don't").unwrap(), vec!["note_add", "don't"]);
        assert_eq!(
            tokenize("contact_add O'Brien \"Main st\"").unwrap(),
            vec!["contact_add", "O'Brien", "Main st"]
        );
        let input = "contacts_list filter name=O'Neil,address=5\"b custom -name";
        assert_eq!(
            tokenize(input).unwrap(),
            input.split_whitespace().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_unterminated_quote() {
        let err = tokenize("note_add \"half open").unwrap_err();
        assert_eq!(AssistantError::find(&err).unwrap().title(), "Invalid Command");
    }
}
