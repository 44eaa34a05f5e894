//! Procedural macros for the `aoc-framework` crate.

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Error, Expr, Ident, Item, Token, Type, parse_macro_input};

/// One `key = value` property of the attribute.
enum Property {
    Name(Expr),
    Parsed(Type),
    PartOne(Type),
    PartTwo(Type),
}

impl Parse for Property {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let key: Ident = input.parse()?;
        input.parse::<Token![=]>()?;
        match key.to_string().as_str() {
            "name" => Ok(Self::Name(input.parse()?)),
            "parsed" => Ok(Self::Parsed(input.parse()?)),
            "part_one" => Ok(Self::PartOne(input.parse()?)),
            "part_two" => Ok(Self::PartTwo(input.parse()?)),
            other => Err(Error::new(
                key.span(),
                format!("unsupported solution runner property: '{other}'"),
            )),
        }
    }
}

/// The validated properties of `#[solution_runner(...)]`.
struct RunnerArgs {
    name: Expr,
    parsed: Option<Type>,
    part_one: Type,
    part_two: Option<Type>,
}

impl Parse for RunnerArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        fn set_once<T>(slot: &mut Option<T>, value: T, key: &str) -> syn::Result<()> {
            if slot.replace(value).is_some() {
                return Err(Error::new(
                    Span::call_site(),
                    format!("duplicate '{key}' property"),
                ));
            }
            Ok(())
        }

        let mut name = None;
        let mut parsed = None;
        let mut part_one = None;
        let mut part_two = None;

        for property in Punctuated::<Property, Token![,]>::parse_terminated(input)? {
            match property {
                Property::Name(expr) => set_once(&mut name, expr, "name")?,
                Property::Parsed(ty) => set_once(&mut parsed, ty, "parsed")?,
                Property::PartOne(ty) => set_once(&mut part_one, ty, "part_one")?,
                Property::PartTwo(ty) => set_once(&mut part_two, ty, "part_two")?,
            }
        }

        let missing = |key: &str| {
            Error::new(
                Span::call_site(),
                format!("missing required property: '{key}'"),
            )
        };
        Ok(Self {
            name: name.ok_or_else(|| missing("name"))?,
            parsed,
            part_one: part_one.ok_or_else(|| missing("part_one"))?,
            part_two,
        })
    }
}

impl RunnerArgs {
    /// The call into `aoc_framework::runner` matching the provided properties.
    fn solve_call(&self) -> proc_macro2::TokenStream {
        let Self {
            name,
            parsed,
            part_one,
            part_two,
        } = self;

        match (parsed, part_two) {
            (None, None) => quote! {
                aoc_framework::runner::solve_half_solution::<#part_one>(#name, input, handler, timed)
            },
            (None, Some(part_two)) => quote! {
                aoc_framework::runner::solve_full_solution::<#part_one, #part_two>(
                    #name, input, handler, timed
                )
            },
            (Some(parsed), None) => quote! {
                aoc_framework::runner::solve_parsed_half_solution::<#parsed, #part_one>(
                    #name, input, handler, timed
                )
            },
            (Some(parsed), Some(part_two)) => quote! {
                aoc_framework::runner::solve_parsed_full_solution::<#parsed, #part_one, #part_two>(
                    #name, input, handler, timed
                )
            },
        }
    }
}

/// Attribute macro implementing `SolutionRunner` for a struct or the self type of an impl block.
///
/// # Properties
///
/// - `name` (required): an expression evaluating to `&str`, the solution's display name.
/// - `part_one` (required): the type implementing `Solution<PartOne>`.
/// - `part_two` (optional): the type implementing `Solution<PartTwo>`; without it only part one
///   runs.
/// - `parsed` (optional): a `ParseData` type built once from the input and handed to both parts;
///   without it the parts receive the raw input string.
///
/// Unknown, duplicate, or missing required properties are compile errors, as is applying the
/// attribute to anything but a struct or impl block.
///
/// # Examples
///
/// ```ignore
/// #[solution_runner(name = "Day 17: Clumsy Crucible", parsed = CostGrid, part_one = Day17, part_two = Day17)]
/// impl super::AdventOfCode2023<17> {}
/// ```
#[proc_macro_attribute]
pub fn solution_runner(args: TokenStream, input: TokenStream) -> TokenStream {
    let args = parse_macro_input!(args as RunnerArgs);
    let item = parse_macro_input!(input as Item);

    let self_ty = match &item {
        Item::Struct(item_struct) => {
            let ident = &item_struct.ident;
            quote! { #ident }
        }
        Item::Impl(item_impl) => {
            let self_ty = &item_impl.self_ty;
            quote! { #self_ty }
        }
        _ => {
            return Error::new(
                Span::call_site(),
                "the #[solution_runner] macro can only be applied to a struct or an impl block",
            )
            .to_compile_error()
            .into();
        }
    };

    let solve_call = args.solve_call();
    TokenStream::from(quote! {
        #item

        impl aoc_framework::runner::SolutionRunner for #self_ty {
            fn run(
                input: &str,
                handler: &mut dyn aoc_framework::runner::OutputHandler,
                timed: bool,
            ) -> aoc_framework::DynamicResult<()> {
                #solve_call
            }
        }
    })
}
