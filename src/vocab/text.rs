// Text folding and tokenization shared by vocabulary lookup and prompt lexing
//
// Folding rules:
// - lowercase, common Latin diacritics folded ("Séance" -> "seance")
// - apostrophes dropped so "Director's Cut" -> "directors cut"
// - every other non-alphanumeric character separates words
//
// Tokens remember whether a delimiter preceded them. Hard breaks (commas,
// semicolons, question marks, newlines...) can never sit inside a vocabulary
// phrase; soft breaks (periods, exclamation marks) can, because names such as
// "Mr. Bones" and "Oops! All 6s" contain them. A break made only of list
// separators (`,` `&` `/`) is flagged separately: it continues an enumeration
// rather than starting a new clause.

/// A folded word plus the delimiters seen right before it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub hard_break: bool,
    pub soft_break: bool,
    /// Every delimiter before this token was a list separator
    pub list_break: bool,
    /// The word started with an upper-case letter before folding
    pub capitalized: bool,
}

impl Token {
    /// True when any delimiter separates this token from the previous one
    pub fn starts_segment(&self) -> bool {
        self.hard_break || self.soft_break
    }
}

/// Fold a raw string into space-separated lowercase words
pub fn fold(raw: &str) -> String {
    tokenize(raw)
        .into_iter()
        .map(|token| token.text)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split raw text into folded tokens
pub fn tokenize(raw: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word = String::new();
    let mut breaks = Breaks::default();
    let mut capital = false;

    for c in raw.chars() {
        match c {
            '\'' | '\u{2019}' | '`' => continue,
            ',' | '&' | '/' => {
                flush(&mut tokens, &mut word, &mut breaks, &mut capital);
                breaks.hard = true;
                breaks.list = true;
            }
            ';' | '?' | ':' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '\n' | '\r' => {
                flush(&mut tokens, &mut word, &mut breaks, &mut capital);
                breaks.hard = true;
                breaks.clause = true;
            }
            '.' | '!' => {
                flush(&mut tokens, &mut word, &mut breaks, &mut capital);
                breaks.soft = true;
                breaks.clause = true;
            }
            _ => {
                if word.is_empty() && c.is_uppercase() {
                    capital = true;
                }
                let mut pushed = false;
                for lower in c.to_lowercase() {
                    let folded = fold_diacritic(lower);
                    if folded.is_alphanumeric() {
                        word.push(folded);
                        pushed = true;
                    }
                }
                if !pushed {
                    flush(&mut tokens, &mut word, &mut breaks, &mut capital);
                }
            }
        }
    }
    flush(&mut tokens, &mut word, &mut breaks, &mut capital);
    tokens
}

/// Delimiters seen since the last word
#[derive(Default)]
struct Breaks {
    hard: bool,
    soft: bool,
    list: bool,
    clause: bool,
}

fn flush(tokens: &mut Vec<Token>, word: &mut String, breaks: &mut Breaks, capital: &mut bool) {
    if word.is_empty() {
        return;
    }
    tokens.push(Token {
        text: std::mem::take(word),
        hard_break: breaks.hard,
        soft_break: breaks.soft,
        list_break: breaks.list && !breaks.clause,
        capitalized: std::mem::take(capital),
    });
    *breaks = Breaks::default();
}

fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_names() {
        assert_eq!(fold("Séance"), "seance");
        assert_eq!(fold("Director's Cut"), "directors cut");
        assert_eq!(fold("Oops! All 6s"), "oops all 6s");
        assert_eq!(fold("  Mail-In   Rebate "), "mail in rebate");
        assert_eq!(fold("???"), "");
    }

    #[test]
    fn test_tokenize_marks_breaks() {
        let tokens = tokenize("Perkeo, maybe Mr. Bones");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["perkeo", "maybe", "mr", "bones"]);
        assert!(!tokens[0].starts_segment());
        assert!(tokens[1].hard_break);
        assert!(tokens[3].soft_break);
        assert!(!tokens[3].hard_break);
    }

    #[test]
    fn test_tokenize_ampersand_is_hard_break() {
        let tokens = tokenize("Blueprint & Brainstorm");
        assert_eq!(tokens.len(), 2);
        assert!(tokens[1].hard_break);
        assert!(tokens[1].list_break);
    }

    #[test]
    fn test_tokenize_remembers_capitals() {
        let tokens = tokenize("the Order, Émile order");
        let capitals: Vec<bool> = tokens.iter().map(|t| t.capitalized).collect();
        assert_eq!(capitals, vec![false, true, true, false]);
    }

    #[test]
    fn test_tokenize_clause_breaks_are_not_list_breaks() {
        let tokens = tokenize("Perkeo, Blueprint. Brainstorm,; Baron");
        assert!(tokens[1].list_break);
        assert!(!tokens[2].list_break);
        assert!(tokens[2].soft_break);
        assert!(!tokens[3].list_break);
        assert!(tokens[3].hard_break);
    }
}
