//! Attribute macros for the Tarry runtime.
//!
//! Both macros turn an `async fn` into a plain function that builds a
//! runtime and blocks on the original body. The runtime can be tuned with
//! `task_capacity = N` and `timer_capacity = N`:
//!
//! ```rust,ignore
//! #[tarry::main(task_capacity = 256)]
//! async fn main() {}
//! ```

mod utils;

use proc_macro::TokenStream;

use utils::{RuntimeArgs, compile_error, wrap_async_fn};

#[proc_macro_attribute]
pub fn main(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand(attr, item).unwrap_or_else(|err| compile_error(&err))
}

/// Like [`main`], and marks the function as a `#[test]`.
///
/// The body's value is returned, so tests may return a `Result`.
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
    match expand(attr, item) {
        Ok(function) => {
            let mut output: TokenStream = "#[::core::prelude::v1::test]"
                .parse()
                .unwrap_or_default();
            output.extend(function);
            output
        }
        Err(err) => compile_error(&err),
    }
}

fn expand(attr: TokenStream, item: TokenStream) -> Result<TokenStream, String> {
    let args = RuntimeArgs::parse(attr)?;
    wrap_async_fn(item, &args.builder())
}
