//! `render := "render" ("list"|"table"|"detail"|"form") [ "(" option_args ")" ]`.

use crate::cursor::TokenCursor;
use crate::grammar::options::parse_paren_option_args;
use ymir_ast::render::{RenderBlock, RenderType};
use ymir_diagnostics::DiagnosticSink;
use ymir_lexer::token::TokenKind;

pub fn parse_render(cursor: &mut TokenCursor, sink: &mut DiagnosticSink) -> RenderBlock {
    cursor.match_kind(TokenKind::Render, false, None, sink);
    let render_type = match cursor.peek_kind() {
        TokenKind::List => {
            cursor.advance();
            RenderType::List
        }
        TokenKind::Table => {
            cursor.advance();
            RenderType::Table
        }
        TokenKind::Detail => {
            cursor.advance();
            RenderType::Detail
        }
        TokenKind::Form => {
            cursor.advance();
            RenderType::Form
        }
        _ => {
            let found = cursor.peek().clone();
            sink.error(
                found.position,
                format!("unknown render type: {:?} ('{}')", found.kind, found.text),
            );
            RenderType::Form
        }
    };
    let options = if cursor.peek_kind() == TokenKind::LParen {
        Some(parse_paren_option_args(cursor, sink))
    } else {
        None
    };
    RenderBlock { render_type, options }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ymir_lexer::tokenize;

    #[test]
    fn parses_render_table_with_options() {
        let result = tokenize("render table (pageSize: 20)", None);
        let mut cursor = TokenCursor::new(&result.tokens);
        let mut sink = DiagnosticSink::new();
        let block = parse_render(&mut cursor, &mut sink);
        assert_eq!(sink.error_count(), 0);
        assert_eq!(block.render_type, RenderType::Table);
        assert_eq!(block.options.unwrap().get("pageSize").unwrap().as_number(), Some(20.0));
    }
}
