use winnow::combinator::{alt, cut_err, delimited, eof, fail, opt, preceded, repeat, separated};
use winnow::error::{ErrMode, ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::stream::Stateful;
use winnow::token::{one_of, take_while};

use super::MAX_DEPTH;
use crate::{BinaryOp, Formula, UnaryOp};

/// Parenthesised groups, calls, prefix operators and conditional branches
/// each recurse through the grammar. Past this many open levels the formula
/// is rejected.
pub(super) const MAX_NESTING: usize = 32;

#[derive(Debug, Clone, Copy, Default)]
struct Nesting {
    depth: usize,
}

type Input<'i> = Stateful<&'i str, Nesting>;

fn nested<'i, O>(
    input: &mut Input<'i>,
    parser: impl FnOnce(&mut Input<'i>) -> ModalResult<O>,
) -> ModalResult<O> {
    if input.state.depth >= MAX_NESTING {
        return too_deep(input);
    }
    input.state.depth += 1;
    let result = parser(input);
    input.state.depth -= 1;
    result
}

fn too_deep<O>(input: &mut Input<'_>) -> ModalResult<O> {
    cut_err(fail::<_, O, _>)
        .context(StrContext::Expected(StrContextValue::Description(
            "a less deeply nested formula",
        )))
        .parse_next(input)
}

// -- Whitespace -------------------------------------------------------------

fn ws(input: &mut Input<'_>) -> ModalResult<()> {
    take_while(0.., |c: char| c.is_whitespace())
        .void()
        .parse_next(input)
}

// -- Identifiers ------------------------------------------------------------

fn ident<'i>(input: &mut Input<'i>) -> ModalResult<&'i str> {
    (
        take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| {
            c.is_ascii_alphanumeric() || c == '_' || c == '.'
        }),
    )
        .take()
        .parse_next(input)
}

// -- Literals ---------------------------------------------------------------

fn digits<'i>(input: &mut Input<'i>) -> ModalResult<&'i str> {
    take_while(1.., |c: char| c.is_ascii_digit()).parse_next(input)
}

fn number(input: &mut Input<'_>) -> ModalResult<f64> {
    alt((
        (
            digits,
            opt(('.', digits)),
            opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digits)),
        )
            .take(),
        ('.', digits).take(),
    ))
    .try_map(|s: &str| s.parse::<f64>())
    .parse_next(input)
}

// -- Primaries --------------------------------------------------------------

fn call_args(input: &mut Input<'_>) -> ModalResult<Vec<Formula>> {
    delimited(
        '(',
        separated(0.., formula, (ws, ',')),
        (ws, cut_err(')')),
    )
    .parse_next(input)
}

fn variable_or_call(input: &mut Input<'_>) -> ModalResult<Formula> {
    let name = ident.parse_next(input)?;
    let checkpoint = input.checkpoint();
    ws.parse_next(input)?;
    if input.starts_with('(') {
        let args = nested(input, call_args)?;
        return Ok(Formula::Call {
            function: name.to_owned(),
            args,
        });
    }
    input.reset(&checkpoint);
    Ok(match name {
        "true" => Formula::Number(1.0),
        "false" => Formula::Number(0.0),
        _ => Formula::Variable(name.to_owned()),
    })
}

fn group(input: &mut Input<'_>) -> ModalResult<Formula> {
    nested(input, formula)
}

fn primary(input: &mut Input<'_>) -> ModalResult<Formula> {
    ws.parse_next(input)?;
    alt((
        delimited('(', group, (ws, cut_err(')'))),
        number.map(Formula::Number),
        variable_or_call,
    ))
    .context(StrContext::Expected(StrContextValue::Description(
        "operand",
    )))
    .parse_next(input)
}

fn unary_op(input: &mut Input<'_>) -> ModalResult<UnaryOp> {
    alt((
        '-'.value(UnaryOp::Neg),
        '+'.value(UnaryOp::Plus),
        '!'.value(UnaryOp::Not),
    ))
    .parse_next(input)
}

fn prefixed(input: &mut Input<'_>) -> ModalResult<Formula> {
    nested(input, unary)
}

fn unary(input: &mut Input<'_>) -> ModalResult<Formula> {
    ws.parse_next(input)?;
    if let Some(op) = opt(unary_op).parse_next(input)? {
        let inner = cut_err(prefixed).parse_next(input)?;
        Ok(Formula::Unary(op, Box::new(inner)))
    } else {
        primary(input)
    }
}

// -- Binary levels (precedence: || < && < equality < relational < additive < multiplicative)

/// Left-folds a chain, refusing trees deeper than [`MAX_DEPTH`] before they
/// are built.
fn fold(
    input: &mut Input<'_>,
    first: Formula,
    rest: Vec<(BinaryOp, Formula)>,
) -> ModalResult<Formula> {
    let links = rest.len();
    let depth = rest
        .iter()
        .enumerate()
        .map(|(i, (_, rhs))| rhs.depth() + links - i)
        .fold(first.depth() + links, usize::max);
    if depth > MAX_DEPTH {
        return too_deep(input);
    }
    Ok(rest
        .into_iter()
        .fold(first, |acc, (op, rhs)| Formula::binary(op, acc, rhs)))
}

fn multiplicative(input: &mut Input<'_>) -> ModalResult<Formula> {
    let first = unary(input)?;
    let rest: Vec<(BinaryOp, Formula)> = repeat(
        0..,
        (
            preceded(
                ws,
                alt((
                    '*'.value(BinaryOp::Mul),
                    '/'.value(BinaryOp::Div),
                    '%'.value(BinaryOp::Rem),
                )),
            ),
            cut_err(unary),
        ),
    )
    .parse_next(input)?;
    fold(input, first, rest)
}

fn additive(input: &mut Input<'_>) -> ModalResult<Formula> {
    let first = multiplicative(input)?;
    let rest: Vec<(BinaryOp, Formula)> = repeat(
        0..,
        (
            preceded(
                ws,
                alt(('+'.value(BinaryOp::Add), '-'.value(BinaryOp::Sub))),
            ),
            cut_err(multiplicative),
        ),
    )
    .parse_next(input)?;
    fold(input, first, rest)
}

fn relational(input: &mut Input<'_>) -> ModalResult<Formula> {
    let first = additive(input)?;
    let rest: Vec<(BinaryOp, Formula)> = repeat(
        0..,
        (
            preceded(
                ws,
                alt((
                    ">=".value(BinaryOp::Gte),
                    ">".value(BinaryOp::Gt),
                    "<=".value(BinaryOp::Lte),
                    "<".value(BinaryOp::Lt),
                )),
            ),
            cut_err(additive),
        ),
    )
    .parse_next(input)?;
    fold(input, first, rest)
}

fn equality(input: &mut Input<'_>) -> ModalResult<Formula> {
    let first = relational(input)?;
    let rest: Vec<(BinaryOp, Formula)> = repeat(
        0..,
        (
            preceded(
                ws,
                alt(("==".value(BinaryOp::Eq), "!=".value(BinaryOp::Neq))),
            ),
            cut_err(relational),
        ),
    )
    .parse_next(input)?;
    fold(input, first, rest)
}

fn and_expr(input: &mut Input<'_>) -> ModalResult<Formula> {
    let first = equality(input)?;
    let rest: Vec<(BinaryOp, Formula)> = repeat(
        0..,
        (preceded(ws, "&&".value(BinaryOp::And)), cut_err(equality)),
    )
    .parse_next(input)?;
    fold(input, first, rest)
}

fn or_expr(input: &mut Input<'_>) -> ModalResult<Formula> {
    let first = and_expr(input)?;
    let rest: Vec<(BinaryOp, Formula)> = repeat(
        0..,
        (preceded(ws, "||".value(BinaryOp::Or)), cut_err(and_expr)),
    )
    .parse_next(input)?;
    fold(input, first, rest)
}

fn branches(input: &mut Input<'_>) -> ModalResult<(Formula, Formula)> {
    nested(input, |i| (formula, preceded((ws, ':'), formula)).parse_next(i))
}

fn conditional(input: &mut Input<'_>) -> ModalResult<Formula> {
    let condition = or_expr(input)?;
    let arms = opt(preceded((ws, '?'), cut_err(branches))).parse_next(input)?;
    Ok(match arms {
        Some((then, otherwise)) => Formula::Conditional {
            condition: Box::new(condition),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        },
        None => condition,
    })
}

fn formula(input: &mut Input<'_>) -> ModalResult<Formula> {
    ws.parse_next(input)?;
    conditional(input)
}

// -- Top-level parser -------------------------------------------------------

fn formula_to_end(input: &mut Input<'_>) -> ModalResult<Formula> {
    let parsed = formula
        .context(StrContext::Expected(StrContextValue::Description(
            "formula",
        )))
        .parse_next(input)?;
    (ws, eof)
        .context(StrContext::Expected(StrContextValue::Description(
            "end of formula",
        )))
        .parse_next(input)?;
    Ok(parsed)
}

/// Parse a whole formula, returning the grammar's complaint on failure.
pub(super) fn parse_formula(text: &str) -> Result<Formula, String> {
    let mut input = Input {
        input: text,
        state: Nesting::default(),
    };
    formula_to_end(&mut input).map_err(|err| match err {
        ErrMode::Backtrack(context) | ErrMode::Cut(context) => context.to_string(),
        ErrMode::Incomplete(_) => "incomplete formula".to_owned(),
    })
}
