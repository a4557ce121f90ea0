use tessera::composition::{CodeFragment, Composition, Token};
use tessera::error::TesseraError;
use tessera::template::{tokenize, Grammar, Tokenizer};

fn literal(text: &str) -> Token {
    Token::Literal(text.to_string())
}

#[test]
fn named_fragment_followed_by_text() {
    let tokens = tokenize("`ri(1,100)`(chance)% chance when struck").expect("tokens");
    assert_eq!(
        tokens,
        vec![
            Token::Code(CodeFragment::named("chance", "ri(1,100)")),
            literal("% chance when struck"),
        ]
    );
}

#[test]
fn text_without_delimiters_is_one_literal() {
    for source in ["plain text", "a", "multi\nline (with parens)", "ünïcödé"] {
        assert_eq!(tokenize(source).expect("tokens"), vec![literal(source)], "{source}");
    }
}

#[test]
fn escapes_are_removed_from_literals() {
    assert_eq!(tokenize("\\`").unwrap(), vec![literal("`")]);
    assert_eq!(tokenize("a\\\\b").unwrap(), vec![literal("a\\b")]);
    assert_eq!(tokenize("\\x\\`y\\`").unwrap(), vec![literal("x`y`")]);
}

#[test]
fn mixed_template() {
    let source = "Have a `ri(1,100)`(chance)% chance of `ri(1,999)` for `randomt(1s,1d)`. That chance is: `chance`";
    let tokens = tokenize(source).expect("tokens");
    assert_eq!(
        tokens,
        vec![
            literal("Have a "),
            Token::Code(CodeFragment::named("chance", "ri(1,100)")),
            literal("% chance of "),
            Token::Code(CodeFragment::anonymous("ri(1,999)")),
            literal(" for "),
            Token::Code(CodeFragment::anonymous("randomt(1s,1d)")),
            literal(". That chance is: "),
            Token::Code(CodeFragment::anonymous("chance")),
        ]
    );
}

#[test]
fn adjacent_fragments_and_empty_code() {
    let tokens = tokenize("``(empty)`b`").expect("tokens");
    assert_eq!(
        tokens,
        vec![
            Token::Code(CodeFragment::named("empty", "")),
            Token::Code(CodeFragment::anonymous("b")),
        ]
    );
}

#[test]
fn binding_block_needs_to_follow_immediately() {
    let tokens = tokenize("`x` (name)").expect("tokens");
    assert_eq!(
        tokens,
        vec![Token::Code(CodeFragment::anonymous("x")), literal(" (name)")]
    );
    // an escaped parenthesis is literal text as well
    let tokens = tokenize("`x`\\(name)").expect("tokens");
    assert_eq!(
        tokens,
        vec![Token::Code(CodeFragment::anonymous("x")), literal("(name)")]
    );
}

#[test]
fn malformed_templates_fail() {
    assert!(matches!(tokenize("").unwrap_err(), TesseraError::InvalidSource(_)));
    assert_eq!(
        tokenize("`unterminated").unwrap_err(),
        TesseraError::UnexpectedEndOfInput { length: 13 }
    );
    assert_eq!(
        tokenize("text `").unwrap_err(),
        TesseraError::UnexpectedEndOfInput { length: 6 }
    );
    assert_eq!(
        tokenize("`x`(name").unwrap_err(),
        TesseraError::UnexpectedEndOfInput { length: 8 }
    );
    assert_eq!(
        tokenize("dangling \\").unwrap_err(),
        TesseraError::UnexpectedEndOfInput { length: 10 }
    );
}

#[test]
fn read_next_one_token_at_a_time() {
    let mut tokenizer = Tokenizer::new("a`b`(c)d").expect("tokenizer");
    assert_eq!(tokenizer.read_next().unwrap(), literal("a"));
    assert_eq!(
        tokenizer.read_next().unwrap(),
        Token::Code(CodeFragment::named("c", "b"))
    );
    assert_eq!(tokenizer.read_next().unwrap(), literal("d"));
    assert!(tokenizer.scanner().at_end());
}

#[test]
fn custom_grammar() {
    let grammar = Grammar {
        code_open: '{',
        code_close: '}',
        escape: '~',
        binding_open: '[',
        binding_close: ']',
    };
    let composition = Tokenizer::with_grammar("Roll {d(6)}[roll] ~{not code~}", grammar)
        .expect("tokenizer")
        .compose()
        .expect("composition");
    assert_eq!(
        composition.tokens(),
        &[
            literal("Roll "),
            Token::Code(CodeFragment::named("roll", "d(6)")),
            literal(" {not code}"),
        ]
    );
    assert_eq!(composition.grammar(), &grammar);
    assert_eq!(composition.get(1).unwrap().to_string(), "`d(6)`(roll)");
    assert_eq!(composition.to_display_string(), "Roll {d(6)}[roll] {not code}");
}

#[test]
fn display_round_trip() {
    let source = "Deal `ri(5,10)`(damage) damage, then `damage * 2` more";
    let composition: Composition = source.parse().expect("composition");
    assert_eq!(composition.to_display_string(), source);
    let reparsed: Composition = composition.to_display_string().parse().expect("composition");
    assert_eq!(reparsed, composition);
}
