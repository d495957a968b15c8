use proc_macro::{Delimiter, Group, Ident, Span, TokenStream, TokenTree};

/// Runtime settings accepted by `#[tarry::main]` and `#[tarry::test]`.
#[derive(Default)]
pub(crate) struct RuntimeArgs {
    pub(crate) task_capacity: Option<usize>,
    pub(crate) timer_capacity: Option<usize>,
}

impl RuntimeArgs {
    /// Parses `key = value` pairs separated by commas.
    pub(crate) fn parse(attr: TokenStream) -> Result<Self, String> {
        let mut args = RuntimeArgs::default();

        for pair in split_args(attr) {
            let [TokenTree::Ident(key), TokenTree::Punct(eq), TokenTree::Literal(value)] =
                pair.as_slice()
            else {
                return Err(format!(
                    "expected `key = value`, found `{}`",
                    tokens_to_string(&pair)
                ));
            };

            if eq.as_char() != '=' {
                return Err(format!("expected `=` after `{key}`"));
            }

            let value = value
                .to_string()
                .replace('_', "")
                .parse::<usize>()
                .map_err(|_| format!("`{key}` expects an integer, found `{value}`"))?;

            match key.to_string().as_str() {
                "task_capacity" => args.task_capacity = Some(value),
                "timer_capacity" => args.timer_capacity = Some(value),
                other => {
                    return Err(format!(
                        "unknown option `{other}`, expected `task_capacity` or `timer_capacity`"
                    ));
                }
            }
        }

        Ok(args)
    }

    /// Source of the expression building the runtime.
    pub(crate) fn builder(&self) -> String {
        let mut builder = String::from("::tarry::RuntimeBuilder::new()");

        if let Some(n) = self.task_capacity {
            builder.push_str(&format!(".task_capacity({n})"));
        }

        if let Some(n) = self.timer_capacity {
            builder.push_str(&format!(".timer_capacity({n})"));
        }

        builder.push_str(".build()");
        builder
    }
}

/// Replaces the body of an `async fn` with a blocking call into a fresh
/// runtime, and drops the `async` keyword.
pub(crate) fn wrap_async_fn(item: TokenStream, builder: &str) -> Result<TokenStream, String> {
    let mut tokens: Vec<TokenTree> = item.into_iter().collect();

    let Some(async_pos) = tokens
        .iter()
        .position(|t| matches!(t, TokenTree::Ident(id) if id.to_string() == "async"))
    else {
        return Err("the `async` keyword is missing from the function declaration".to_owned());
    };
    tokens.remove(async_pos);

    let Some(body_pos) = tokens
        .iter()
        .rposition(|t| matches!(t, TokenTree::Group(g) if g.delimiter() == Delimiter::Brace))
    else {
        return Err("expected a function body".to_owned());
    };

    let TokenTree::Group(body) = &tokens[body_pos] else {
        unreachable!();
    };

    // `async move { <body> }` keeps the original spans of the body.
    let future: TokenStream = [
        TokenTree::Ident(Ident::new("async", Span::call_site())),
        TokenTree::Ident(Ident::new("move", Span::call_site())),
        TokenTree::Group(Group::new(Delimiter::Brace, body.stream())),
    ]
    .into_iter()
    .collect();

    let mut block: TokenStream = format!("let runtime = {builder}; runtime.block_on")
        .parse()
        .map_err(|err| format!("invalid runtime builder: {err}"))?;
    block.extend([TokenTree::Group(Group::new(Delimiter::Parenthesis, future))]);

    tokens[body_pos] = TokenTree::Group(Group::new(Delimiter::Brace, block));

    Ok(tokens.into_iter().collect())
}

/// Expands to a `compile_error!` carrying `message`.
pub(crate) fn compile_error(message: &str) -> TokenStream {
    format!("::core::compile_error!({message:?});")
        .parse()
        .unwrap_or_default()
}

/// Splits a `TokenStream` into comma-separated arguments.
fn split_args(input: TokenStream) -> Vec<Vec<TokenTree>> {
    let mut args = Vec::new();
    let mut current = Vec::new();

    for token in input {
        match &token {
            TokenTree::Punct(p) if p.as_char() == ',' => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(token),
        }
    }

    if !current.is_empty() {
        args.push(current);
    }

    args
}

/// Renders tokens back to source, for error messages.
fn tokens_to_string(tokens: &[TokenTree]) -> String {
    tokens
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
