//! The ZBC parser.
//!
//! Line-oriented: a `[categories]` section declaring the item groups, then
//! a `[clues]` section with one clue per line. Clues parse by recursive
//! descent, loosest binding first: `<=>`, `=>`, `|`, `^`, `&`, `!`, then
//! comparisons (relational, positional, `in`), then `+ - diff`, then
//! `* / %`.
//!
//! The parser also performs the kind-typing pass, so the solver's matches
//! over the AST are total: positional operators take exactly two
//! identifiers, relational and arithmetic operators take arithmetic
//! operands, membership sets are kind-homogeneous, and every clue root is
//! logical. The adjacency sugar `A _ B` desugars here into
//! `(A - B) | (B - A)`.

use crate::error::{Result, SolverError};
use crate::puzzle::ast::{
    ArithOp, Expr, ExprKind, LogicalOp, NaryOp, NodeId, PositionalOp, RelOp, Returns, Span,
};
use crate::puzzle::category::{Categories, Category};
use crate::puzzle::lexer::{tokenize_line, Token, TokenKind};

#[derive(Debug)]
pub struct ParsedPuzzle {
    pub categories: Categories,
    pub clues: Vec<Expr>,
}

pub fn parse_source(source: &str) -> Result<ParsedPuzzle> {
    #[derive(PartialEq)]
    enum Section {
        Preamble,
        Categories,
        Clues,
    }

    let mut section = Section::Preamble;
    let mut categories = Categories::new();
    let mut clues = Vec::new();
    let mut ids = NodeIds::default();

    for (index, raw) in source.lines().enumerate() {
        let line_no = index as u32 + 1;
        let tokens = tokenize_line(raw, line_no)?;
        if tokens.is_empty() {
            continue;
        }

        if let Some(name) = section_header(&tokens) {
            section = match name {
                "categories" => Section::Categories,
                "clues" => Section::Clues,
                other => {
                    return Err(parse_error(
                        format!("unknown section `[{other}]`"),
                        &tokens[0],
                    ));
                }
            };
            continue;
        }

        match section {
            Section::Preamble => {
                return Err(parse_error("expected a section header", &tokens[0]));
            }
            Section::Categories => categories.push(parse_category_line(&tokens)?)?,
            Section::Clues => {
                let mut parser = ClueParser {
                    tokens: &tokens,
                    pos: 0,
                    ids: &mut ids,
                };
                clues.push(parser.parse_clue()?);
            }
        }
    }

    Ok(ParsedPuzzle { categories, clues })
}

fn parse_error(message: impl Into<String>, token: &Token) -> crate::error::Error {
    SolverError::Parse {
        message: message.into(),
        line: token.line,
        column: token.column,
    }
    .into()
}

fn section_header(tokens: &[Token]) -> Option<&str> {
    match tokens {
        [Token {
            kind: TokenKind::LBracket,
            ..
        }, Token {
            kind: TokenKind::Word(name),
            ..
        }, Token {
            kind: TokenKind::RBracket,
            ..
        }] => Some(name.as_str()),
        _ => None,
    }
}

/// `name: item, item, ...`, with a `*` prefix marking a great category.
fn parse_category_line(tokens: &[Token]) -> Result<Category> {
    let mut pos = 0;
    let strict = if tokens[0].kind == TokenKind::Star {
        pos += 1;
        false
    } else {
        true
    };

    let name = match tokens.get(pos).map(|t| &t.kind) {
        Some(TokenKind::Word(name)) if !name.contains('.') => name.clone(),
        _ => return Err(parse_error("expected a category name", &tokens[0])),
    };
    pos += 1;
    if tokens.get(pos).map(|t| &t.kind) != Some(&TokenKind::Colon) {
        return Err(parse_error("expected `:` after the category name", &tokens[0]));
    }
    pos += 1;

    let mut items = Vec::new();
    loop {
        match tokens.get(pos).map(|t| &t.kind) {
            Some(TokenKind::Word(item)) if !item.contains('.') => items.push(item.clone()),
            Some(TokenKind::Number(n)) => items.push(n.to_string()),
            _ => {
                return Err(parse_error(
                    "expected an item name",
                    tokens.get(pos).unwrap_or(&tokens[0]),
                ));
            }
        }
        pos += 1;
        match tokens.get(pos).map(|t| &t.kind) {
            Some(TokenKind::Comma) => pos += 1,
            None => break,
            _ => return Err(parse_error("expected `,` between items", &tokens[pos])),
        }
    }

    Ok(Category {
        name,
        items,
        strict,
    })
}

#[derive(Debug, Default)]
struct NodeIds(u32);

impl NodeIds {
    fn next(&mut self) -> NodeId {
        let id = NodeId(self.0);
        self.0 += 1;
        id
    }
}

fn subtree_mentions_dollar(kind: &ExprKind) -> bool {
    match kind {
        ExprKind::Ident(symbol) => symbol == "$",
        ExprKind::NumericIdent { symbol, .. } => symbol == "$",
        ExprKind::Number(_) => false,
        ExprKind::Not(inner) => inner.dollar,
        ExprKind::Logical { lhs, rhs, .. }
        | ExprKind::Relational { lhs, rhs, .. }
        | ExprKind::Positional { lhs, rhs, .. }
        | ExprKind::Arith { lhs, rhs, .. } => lhs.dollar || rhs.dollar,
        ExprKind::In { needle, haystack } => needle.dollar || haystack.dollar,
        ExprKind::Range { start, end } => start.dollar || end.dollar,
        ExprKind::Nary { operands, .. } | ExprKind::Set(operands) | ExprKind::Truths(operands) => {
            operands.iter().any(|e| e.dollar)
        }
    }
}

struct ClueParser<'a> {
    tokens: &'a [Token],
    pos: usize,
    ids: &'a mut NodeIds,
}

impl<'a> ClueParser<'a> {
    fn parse_clue(&mut self) -> Result<Expr> {
        let clue = self.parse_iff()?;
        if let Some(token) = self.tokens.get(self.pos) {
            return Err(parse_error("unexpected token after clue", token));
        }
        if clue.returns() != Returns::Logical {
            return Err(self.error_at(clue.span, "a clue must be a logical expression"));
        }
        Ok(clue)
    }

    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn peek_ahead(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| &t.kind)
    }

    fn current(&self) -> &Token {
        self.tokens
            .get(self.pos)
            .unwrap_or_else(|| self.tokens.last().expect("clue lines are never empty"))
    }

    fn advance(&mut self) -> &Token {
        let index = self.pos;
        self.pos += 1;
        &self.tokens[index]
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> Result<()> {
        if self.peek() == Some(&kind) {
            self.pos += 1;
            Ok(())
        } else {
            Err(parse_error(message, self.current()))
        }
    }

    fn error_at(&self, span: Span, message: &str) -> crate::error::Error {
        SolverError::Parse {
            message: message.to_string(),
            line: span.line,
            column: span.column,
        }
        .into()
    }

    fn mk(&mut self, span: Span, kind: ExprKind) -> Expr {
        Expr {
            id: self.ids.next(),
            span,
            dollar: subtree_mentions_dollar(&kind),
            kind,
        }
    }

    fn span_of(token: &Token) -> Span {
        Span {
            line: token.line,
            column: token.column,
        }
    }

    fn mk_logical(&mut self, op: LogicalOp, lhs: Expr, rhs: Expr) -> Result<Expr> {
        for operand in [&lhs, &rhs] {
            if operand.returns() != Returns::Logical {
                return Err(self.error_at(operand.span, "logical operators take logical operands"));
            }
        }
        let span = lhs.span;
        Ok(self.mk(
            span,
            ExprKind::Logical {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
        ))
    }

    fn mk_chain(&mut self, op: NaryOp, mut operands: Vec<Expr>) -> Result<Expr> {
        for operand in &operands {
            if operand.returns() != Returns::Logical {
                return Err(self.error_at(operand.span, "logical operators take logical operands"));
            }
        }
        if operands.len() == 2 {
            let rhs = operands.pop().expect("two operands");
            let lhs = operands.pop().expect("two operands");
            let binary = match op {
                NaryOp::All => LogicalOp::And,
                NaryOp::Any => LogicalOp::Or,
            };
            self.mk_logical(binary, lhs, rhs)
        } else {
            let span = operands[0].span;
            Ok(self.mk(span, ExprKind::Nary { op, operands }))
        }
    }

    fn parse_iff(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_implies()?;
        while self.peek() == Some(&TokenKind::Iff) {
            self.advance();
            let rhs = self.parse_implies()?;
            lhs = self.mk_logical(LogicalOp::Iff, lhs, rhs)?;
        }
        Ok(lhs)
    }

    fn parse_implies(&mut self) -> Result<Expr> {
        let lhs = self.parse_or()?;
        if self.peek() == Some(&TokenKind::Implies) {
            self.advance();
            let rhs = self.parse_implies()?;
            return self.mk_logical(LogicalOp::Implies, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_or(&mut self) -> Result<Expr> {
        let mut operands = vec![self.parse_xor()?];
        while self.peek() == Some(&TokenKind::Pipe) {
            self.advance();
            operands.push(self.parse_xor()?);
        }
        if operands.len() == 1 {
            Ok(operands.pop().expect("one operand"))
        } else {
            self.mk_chain(NaryOp::Any, operands)
        }
    }

    fn parse_xor(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_and()?;
        while self.peek() == Some(&TokenKind::Caret) {
            self.advance();
            let rhs = self.parse_and()?;
            lhs = self.mk_logical(LogicalOp::Xor, lhs, rhs)?;
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let mut operands = vec![self.parse_not()?];
        while self.peek() == Some(&TokenKind::Amp) {
            self.advance();
            operands.push(self.parse_not()?);
        }
        if operands.len() == 1 {
            Ok(operands.pop().expect("one operand"))
        } else {
            self.mk_chain(NaryOp::All, operands)
        }
    }

    fn parse_not(&mut self) -> Result<Expr> {
        if self.peek() == Some(&TokenKind::Bang) {
            let span = Self::span_of(self.current());
            self.advance();
            let inner = self.parse_not()?;
            if inner.returns() != Returns::Logical {
                return Err(self.error_at(inner.span, "`!` takes a logical operand"));
            }
            return Ok(self.mk(span, ExprKind::Not(Box::new(inner))));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr> {
        let lhs = self.parse_additive()?;
        match self.peek() {
            Some(TokenKind::Eq) => {
                self.advance();
                let rhs = self.parse_additive()?;
                self.mk_positional(PositionalOp::Same, lhs, rhs)
            }
            Some(TokenKind::MinusMinus) => {
                self.advance();
                let rhs = self.parse_additive()?;
                self.mk_positional(PositionalOp::LeftOf, lhs, rhs)
            }
            // Only reachable with a non-arithmetic left operand; the
            // additive level consumes `-` otherwise.
            Some(TokenKind::Minus) => {
                self.advance();
                let distance = match (self.peek(), self.peek_ahead(1)) {
                    (
                        Some(&TokenKind::Number(k)),
                        Some(
                            TokenKind::Word(_) | TokenKind::Position(_) | TokenKind::Dollar,
                        ),
                    ) if k >= 0 => {
                        self.advance();
                        k as usize
                    }
                    _ => 1,
                };
                let rhs = self.parse_additive()?;
                self.mk_positional(PositionalOp::LeftBy(distance), lhs, rhs)
            }
            Some(TokenKind::Underscore) => {
                self.advance();
                let rhs = self.parse_additive()?;
                // `A _ B` is adjacency in either direction.
                let left = self.mk_positional(PositionalOp::LeftBy(1), lhs.clone(), rhs.clone())?;
                let right = self.mk_positional(PositionalOp::LeftBy(1), rhs, lhs)?;
                self.mk_logical(LogicalOp::Or, left, right)
            }
            Some(
                TokenKind::EqEq
                | TokenKind::NotEq
                | TokenKind::Lt
                | TokenKind::Le
                | TokenKind::Gt
                | TokenKind::Ge,
            ) => {
                let op = match self.advance().kind {
                    TokenKind::EqEq => RelOp::Eq,
                    TokenKind::NotEq => RelOp::Ne,
                    TokenKind::Lt => RelOp::Lt,
                    TokenKind::Le => RelOp::Le,
                    TokenKind::Gt => RelOp::Gt,
                    TokenKind::Ge => RelOp::Ge,
                    _ => unreachable!("matched above"),
                };
                let rhs = self.parse_additive()?;
                for operand in [&lhs, &rhs] {
                    if operand.returns() != Returns::Arithmetic {
                        return Err(self.error_at(
                            operand.span,
                            "relational operators take arithmetic operands",
                        ));
                    }
                }
                let span = lhs.span;
                Ok(self.mk(
                    span,
                    ExprKind::Relational {
                        op,
                        lhs: Box::new(lhs),
                        rhs: Box::new(rhs),
                    },
                ))
            }
            Some(TokenKind::Word(word)) if word == "in" => {
                self.advance();
                self.parse_membership(lhs)
            }
            _ => Ok(lhs),
        }
    }

    fn mk_positional(&mut self, op: PositionalOp, lhs: Expr, rhs: Expr) -> Result<Expr> {
        for operand in [&lhs, &rhs] {
            if !matches!(operand.kind, ExprKind::Ident(_)) {
                return Err(SolverError::InvalidPositionalOperand {
                    line: operand.span.line,
                    column: operand.span.column,
                }
                .into());
            }
        }
        let span = lhs.span;
        Ok(self.mk(
            span,
            ExprKind::Positional {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
        ))
    }

    fn parse_membership(&mut self, needle: Expr) -> Result<Expr> {
        let needle_kind = needle.returns();
        let is_ident = matches!(needle.kind, ExprKind::Ident(_));
        if !is_ident && needle_kind != Returns::Arithmetic {
            return Err(self.error_at(
                needle.span,
                "`in` takes an identifier or an arithmetic value",
            ));
        }

        match self.peek() {
            Some(TokenKind::LParen) => {
                let span = Self::span_of(self.current());
                self.advance();
                let mut members = vec![self.parse_iff()?];
                while self.peek() == Some(&TokenKind::Comma) {
                    self.advance();
                    members.push(self.parse_iff()?);
                }
                self.expect(TokenKind::RParen, "expected `)` to close the set")?;

                for member in &members {
                    let member_matches = if is_ident {
                        matches!(member.kind, ExprKind::Ident(_))
                    } else {
                        member.returns() == Returns::Arithmetic
                    };
                    if !member_matches {
                        return Err(SolverError::SetRequiresArithmetic {
                            line: member.span.line,
                            column: member.span.column,
                        }
                        .into());
                    }
                }

                let haystack = self.mk(span, ExprKind::Set(members));
                let needle_span = needle.span;
                Ok(self.mk(
                    needle_span,
                    ExprKind::In {
                        needle: Box::new(needle),
                        haystack: Box::new(haystack),
                    },
                ))
            }
            Some(TokenKind::LBracket) => {
                if is_ident {
                    return Err(self.error_at(
                        needle.span,
                        "range membership takes an arithmetic value",
                    ));
                }
                let span = Self::span_of(self.current());
                self.advance();
                let start = self.parse_arith_operand()?;
                self.expect(TokenKind::Comma, "expected `,` inside the range")?;
                let end = self.parse_arith_operand()?;
                self.expect(TokenKind::RBracket, "expected `]` to close the range")?;
                let haystack = self.mk(
                    span,
                    ExprKind::Range {
                        start: Box::new(start),
                        end: Box::new(end),
                    },
                );
                let needle_span = needle.span;
                Ok(self.mk(
                    needle_span,
                    ExprKind::In {
                        needle: Box::new(needle),
                        haystack: Box::new(haystack),
                    },
                ))
            }
            _ => Err(parse_error("expected a set or range after `in`", self.current())),
        }
    }

    fn parse_arith_operand(&mut self) -> Result<Expr> {
        let operand = self.parse_additive()?;
        if operand.returns() != Returns::Arithmetic {
            return Err(self.error_at(operand.span, "expected an arithmetic value"));
        }
        Ok(operand)
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(TokenKind::Plus) => ArithOp::Add,
                // With a non-arithmetic left operand `-` is positional;
                // leave it for the comparison level.
                Some(TokenKind::Minus) if lhs.returns() == Returns::Arithmetic => ArithOp::Sub,
                Some(TokenKind::Word(word)) if word == "diff" => ArithOp::Diff,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_multiplicative()?;
            lhs = self.mk_arith(op, lhs, rhs)?;
        }
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_primary()?;
        loop {
            let op = match self.peek() {
                Some(TokenKind::Star) => ArithOp::Mul,
                Some(TokenKind::Slash) => ArithOp::Div,
                Some(TokenKind::Percent) => ArithOp::Rem,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_primary()?;
            lhs = self.mk_arith(op, lhs, rhs)?;
        }
        Ok(lhs)
    }

    fn mk_arith(&mut self, op: ArithOp, lhs: Expr, rhs: Expr) -> Result<Expr> {
        for operand in [&lhs, &rhs] {
            if operand.returns() != Returns::Arithmetic {
                return Err(self.error_at(
                    operand.span,
                    "arithmetic operators take arithmetic operands",
                ));
            }
        }
        let span = lhs.span;
        Ok(self.mk(
            span,
            ExprKind::Arith {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
        ))
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let Some(kind) = self.peek() else {
            return Err(parse_error("expected an expression", self.current()));
        };
        match kind.clone() {
            TokenKind::Number(n) => {
                let span = Self::span_of(self.advance());
                Ok(self.mk(span, ExprKind::Number(n)))
            }
            TokenKind::Minus => {
                let span = Self::span_of(self.advance());
                match self.peek() {
                    Some(&TokenKind::Number(n)) => {
                        self.advance();
                        Ok(self.mk(span, ExprKind::Number(-n)))
                    }
                    _ => Err(parse_error("expected a number after `-`", self.current())),
                }
            }
            TokenKind::Word(word) if word == "truths" && self.peek_ahead(1) == Some(&TokenKind::LParen) => {
                let span = Self::span_of(self.advance());
                self.advance();
                let mut members = vec![self.parse_iff()?];
                while self.peek() == Some(&TokenKind::Comma) {
                    self.advance();
                    members.push(self.parse_iff()?);
                }
                self.expect(TokenKind::RParen, "expected `)` to close `truths`")?;
                for member in &members {
                    if member.returns() != Returns::Logical {
                        return Err(
                            self.error_at(member.span, "`truths` takes logical clues")
                        );
                    }
                }
                Ok(self.mk(span, ExprKind::Truths(members)))
            }
            TokenKind::Word(word) => {
                let span = Self::span_of(self.advance());
                self.numeric_or_ident(word, span)
            }
            TokenKind::Position(symbol) => {
                let span = Self::span_of(self.advance());
                self.numeric_or_ident(symbol, span)
            }
            TokenKind::Dollar => {
                let span = Self::span_of(self.advance());
                self.numeric_or_ident("$".to_string(), span)
            }
            TokenKind::LParen => {
                let span = Self::span_of(self.advance());
                let first = self.parse_iff()?;
                if self.peek() == Some(&TokenKind::Comma) {
                    let mut members = vec![first];
                    while self.peek() == Some(&TokenKind::Comma) {
                        self.advance();
                        members.push(self.parse_iff()?);
                    }
                    self.expect(TokenKind::RParen, "expected `)` to close the set")?;
                    Ok(self.mk(span, ExprKind::Set(members)))
                } else {
                    self.expect(TokenKind::RParen, "expected `)`")?;
                    Ok(first)
                }
            }
            _ => Err(parse_error("expected an expression", self.current())),
        }
    }

    /// A symbol, or `symbol:category` when a colon follows.
    fn numeric_or_ident(&mut self, symbol: String, span: Span) -> Result<Expr> {
        if self.peek() == Some(&TokenKind::Colon) {
            self.advance();
            let category = match self.peek() {
                Some(TokenKind::Word(name)) => name.clone(),
                _ => return Err(parse_error("expected a category after `:`", self.current())),
            };
            self.advance();
            Ok(self.mk(span, ExprKind::NumericIdent { symbol, category }))
        } else {
            Ok(self.mk(span, ExprKind::Ident(symbol)))
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::SolverError;

    fn parse(source: &str) -> ParsedPuzzle {
        parse_source(source).unwrap()
    }

    fn clue_strings(source: &str) -> Vec<String> {
        parse(source).clues.iter().map(|c| c.to_string()).collect()
    }

    const HEADER: &str = "\
[categories]
name: ana, bo, cy
*age: 10, 20, 30, 40

[clues]
";

    fn with_clues(clues: &str) -> String {
        format!("{HEADER}{clues}\n")
    }

    #[test]
    fn categories_parse_with_great_marker() {
        let parsed = parse(&with_clues("ana = #1"));
        let cats: Vec<_> = parsed.categories.iter().collect();
        assert_eq!(cats.len(), 2);
        assert_eq!(cats[0].name, "name");
        assert!(cats[0].strict);
        assert_eq!(cats[1].name, "age");
        assert!(!cats[1].strict);
        assert_eq!(cats[1].items, vec!["10", "20", "30", "40"]);
    }

    #[test]
    fn clue_shapes_round_trip_through_display() {
        let rendered = clue_strings(&with_clues(
            "\
ana = #1
ana - bo
ana -2 bo
ana -- bo
ana = #1 & bo = #2 & cy = #3
ana = #1 | bo = #2
!(ana = #1) ^ bo = #2
ana = #1 => bo = #2
ana = #1 <=> bo = #2
ana in (bo, cy)
ana:age + bo:age == 40
ana:age in [10, 30]
truths(ana = #1, bo = #2) == 1
cy:age diff 10 == 20
$ = ana",
        ));
        assert_eq!(
            rendered,
            vec![
                "ana = #1",
                "ana - bo",
                "ana -2 bo",
                "ana -- bo",
                "(ana = #1 & bo = #2 & cy = #3)",
                "(ana = #1 | bo = #2)",
                "(!ana = #1 ^ bo = #2)",
                "(ana = #1 => bo = #2)",
                "(ana = #1 <=> bo = #2)",
                "ana in (bo, cy)",
                "(ana:age + bo:age) == 40",
                "ana:age in [10, 30]",
                "truths(ana = #1, bo = #2) == 1",
                "(cy:age diff 10) == 20",
                "$ = ana",
            ]
        );
    }

    #[test]
    fn adjacency_desugars_to_a_disjunction() {
        let rendered = clue_strings(&with_clues("ana _ bo"));
        assert_eq!(rendered, vec!["(ana - bo | bo - ana)"]);
    }

    #[test]
    fn dollar_marks_the_whole_clue() {
        let parsed = parse(&with_clues("$ = ana\nana = #1\n$:age == 10"));
        assert!(parsed.clues[0].dollar);
        assert!(!parsed.clues[1].dollar);
        assert!(parsed.clues[2].dollar);
    }

    #[test]
    fn node_ids_are_unique_across_clues() {
        let parsed = parse(&with_clues("ana = #1\nbo = #2 | cy = #3"));
        let mut seen = std::collections::HashSet::new();
        fn walk(expr: &Expr, seen: &mut std::collections::HashSet<NodeId>) {
            assert!(seen.insert(expr.id), "duplicate id {:?}", expr.id);
            match &expr.kind {
                ExprKind::Not(a) => walk(a, seen),
                ExprKind::Logical { lhs, rhs, .. }
                | ExprKind::Relational { lhs, rhs, .. }
                | ExprKind::Positional { lhs, rhs, .. }
                | ExprKind::Arith { lhs, rhs, .. } => {
                    walk(lhs, seen);
                    walk(rhs, seen);
                }
                ExprKind::In { needle, haystack } => {
                    walk(needle, seen);
                    walk(haystack, seen);
                }
                ExprKind::Range { start, end } => {
                    walk(start, seen);
                    walk(end, seen);
                }
                ExprKind::Nary { operands, .. }
                | ExprKind::Set(operands)
                | ExprKind::Truths(operands) => {
                    for operand in operands {
                        walk(operand, seen);
                    }
                }
                ExprKind::Number(_) | ExprKind::NumericIdent { .. } | ExprKind::Ident(_) => {}
            }
        }
        for clue in &parsed.clues {
            walk(clue, &mut seen);
        }
    }

    #[test]
    fn positional_operators_reject_arithmetic_operands() {
        let err = parse_source(&with_clues("ana = 3")).unwrap_err();
        assert!(matches!(
            err.inner(),
            SolverError::InvalidPositionalOperand { .. }
        ));
    }

    #[test]
    fn mixed_membership_sets_are_rejected() {
        let err = parse_source(&with_clues("ana:age in (10, bo)")).unwrap_err();
        assert!(matches!(err.inner(), SolverError::SetRequiresArithmetic { .. }));

        let err = parse_source(&with_clues("ana in (bo, 10)")).unwrap_err();
        assert!(matches!(err.inner(), SolverError::SetRequiresArithmetic { .. }));
    }

    #[test]
    fn arithmetic_clue_roots_are_rejected() {
        let err = parse_source(&with_clues("ana:age + 1")).unwrap_err();
        match err.inner() {
            SolverError::Parse { message, .. } => {
                assert!(message.contains("logical"), "got: {message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn lines_before_a_section_are_rejected() {
        let err = parse_source("name: ana, bo\n").unwrap_err();
        assert!(matches!(err.inner(), SolverError::Parse { .. }));
    }

    #[test]
    fn errors_carry_the_clue_position() {
        let err = parse_source(&with_clues("ana = 3")).unwrap_err();
        match err.inner() {
            // Line 6: three header lines, a blank, `[clues]`, then the clue.
            SolverError::InvalidPositionalOperand { line, column } => {
                assert_eq!((*line, *column), (6, 7));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
