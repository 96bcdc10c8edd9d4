//! Argument vector normalization
//!
//! The declarative parser matches commands and flags positionally: it
//! expects the command name as a single leading token and does not accept
//! global flags scattered through the vector. Raw user input satisfies
//! neither, so the dispatcher rewrites it first:
//!
//! 1. every known valued-flag token and the token following it move to a
//!    deferred buffer (rescanning after each removal),
//! 2. every known boolean-flag token moves there too (alone),
//! 3. multi-word command names are reassembled into single space-joined
//!    tokens in place,
//! 4. the deferred buffer is appended: valued flags first, then boolean
//!    flags, each class in its captured relative order.
//!
//! The result is a permutation of the input, except that each name merge
//! reduces the token count by the word count of the name minus one.

use brokkr_extensions::CommandRegistry;

/// Rewrite a raw argument vector into the canonical form the parser
/// expects, using the registry's flag classification and command names.
pub fn normalize(args: &[String], registry: &CommandRegistry) -> Vec<String> {
    let (valued, boolean) = registry.flag_sets();

    let mut tokens: Vec<String> = args.to_vec();
    let mut deferred_valued: Vec<String> = Vec::new();
    let mut deferred_boolean: Vec<String> = Vec::new();

    // Valued flags carry the immediately following token as their value.
    // A valued flag in final position has no value to carry; the flag
    // alone is deferred and the parser reports the missing value.
    let mut i = 0;
    while i < tokens.len() {
        if valued.contains(&tokens[i]) {
            deferred_valued.push(tokens.remove(i));
            if i < tokens.len() {
                deferred_valued.push(tokens.remove(i));
            }
        } else {
            i += 1;
        }
    }

    let mut i = 0;
    while i < tokens.len() {
        if boolean.contains(&tokens[i]) {
            deferred_boolean.push(tokens.remove(i));
        } else {
            i += 1;
        }
    }

    reassemble_multiword_names(&mut tokens, registry);

    tokens.extend(deferred_valued);
    tokens.extend(deferred_boolean);
    tokens
}

/// Collapse token runs matching a registered multi-word command name into
/// one space-joined token.
///
/// Candidates are tried longest-first, ties broken lexicographically, so
/// overlapping definitions resolve deterministically; the first match at a
/// starting position wins and there is no backtracking across overlapping
/// candidates.
fn reassemble_multiword_names(tokens: &mut Vec<String>, registry: &CommandRegistry) {
    let mut candidates: Vec<Vec<&str>> = registry
        .multiword_names()
        .iter()
        .map(|name| name.split(' ').collect())
        .collect();
    candidates.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    if candidates.is_empty() {
        return;
    }

    let mut i = 0;
    while i < tokens.len() {
        let matched = candidates.iter().find(|words| {
            tokens.len() >= i + words.len()
                && words.iter().zip(&tokens[i..]).all(|(word, token)| word == token)
        });

        if let Some(words) = matched {
            let joined = words.join(" ");
            tokens.splice(i..i + words.len(), std::iter::once(joined));
        }

        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brokkr_core::command::{Command, CommandContext, CommandRegistration};
    use brokkr_core::schema::{FlagSpec, OptionsSchema};
    use brokkr_extensions::{build_registry, ProfileFilter, ResolutionContext};

    struct NoopCommand;

    impl Command for NoopCommand {
        fn execute(&self, _ctx: &CommandContext) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn registry(registrations: Vec<CommandRegistration>) -> CommandRegistry {
        build_registry(registrations, &ResolutionContext::default(), &ProfileFilter::Any)
    }

    fn server_registry() -> CommandRegistry {
        registry(vec![
            CommandRegistration::new(
                OptionsSchema::new("server start", "Start the local server")
                    .flag(FlagSpec::valued("port", &["-p", "--port"], "PORT", ""))
                    .flag(FlagSpec::switch("debug", &["-d", "--debug"], "")),
                Box::new(NoopCommand),
            ),
            CommandRegistration::new(
                OptionsSchema::new("server stop", "Stop the local server"),
                Box::new(NoopCommand),
            ),
        ])
    }

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn multiword_name_joins_and_flags_relocate() {
        let normalized = normalize(
            &args(&["--debug", "server", "start", "-p", "8000"]),
            &server_registry(),
        );
        assert_eq!(normalized, args(&["server start", "-p", "8000", "--debug"]));
    }

    #[test]
    fn flags_relocate_without_multiword_match() {
        let registry = registry(vec![CommandRegistration::new(
            OptionsSchema::new("create", "Create a project module")
                .flag(FlagSpec::valued("template", &["-t", "--template"], "NAME", "")),
            Box::new(NoopCommand),
        )]);

        let normalized = normalize(&args(&["create", "-t", "activator", "foo"]), &registry);
        assert_eq!(normalized, args(&["create", "foo", "-t", "activator"]));
    }

    #[test]
    fn valued_flags_precede_boolean_flags_in_captured_order() {
        let normalized = normalize(
            &args(&["-d", "-p", "8000", "server", "start", "--base", "/ws", "--trace"]),
            &server_registry(),
        );
        assert_eq!(
            normalized,
            args(&["server start", "-p", "8000", "--base", "/ws", "-d", "--trace"])
        );
    }

    #[test]
    fn valued_flag_value_pairs_stay_adjacent_and_ordered() {
        let normalized = normalize(
            &args(&["server", "start", "-p", "8000", "--base", "/tmp/ws"]),
            &server_registry(),
        );

        let p = normalized.iter().position(|t| t == "-p").unwrap();
        assert_eq!(normalized[p + 1], "8000");
        let b = normalized.iter().position(|t| t == "--base").unwrap();
        assert_eq!(normalized[b + 1], "/tmp/ws");
        assert!(p < b);
    }

    #[test]
    fn trailing_valued_flag_without_value_defers_alone() {
        let normalized = normalize(&args(&["server", "start", "-p"]), &server_registry());
        assert_eq!(normalized, args(&["server start", "-p"]));
    }

    #[test]
    fn longest_candidate_wins_at_a_position() {
        let registry = registry(vec![
            CommandRegistration::new(OptionsSchema::new("server", "Server"), Box::new(NoopCommand)),
            CommandRegistration::new(
                OptionsSchema::new("server start fast", "Fast start"),
                Box::new(NoopCommand),
            ),
            CommandRegistration::new(
                OptionsSchema::new("server start", "Start"),
                Box::new(NoopCommand),
            ),
        ]);

        let normalized = normalize(&args(&["server", "start", "fast"]), &registry);
        assert_eq!(normalized, args(&["server start fast"]));
    }

    #[test]
    fn no_match_leaves_tokens_untouched() {
        let normalized = normalize(&args(&["server", "restart"]), &server_registry());
        assert_eq!(normalized, args(&["server", "restart"]));
    }

    #[test]
    fn empty_vector_normalizes_to_empty() {
        assert!(normalize(&[], &server_registry()).is_empty());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;
        use std::collections::HashMap;

        fn count_tokens(tokens: &[String]) -> HashMap<String, usize> {
            let mut counts = HashMap::new();
            for token in tokens {
                // Undo name merges so multisets compare against raw input
                for word in token.split(' ') {
                    *counts.entry(word.to_string()).or_insert(0) += 1;
                }
            }
            counts
        }

        proptest! {
            #[test]
            fn normalization_permutes_the_token_multiset(
                raw in proptest::collection::vec(
                    prop_oneof![
                        Just("server".to_string()),
                        Just("start".to_string()),
                        Just("stop".to_string()),
                        Just("-p".to_string()),
                        Just("8000".to_string()),
                        Just("--debug".to_string()),
                        Just("--trace".to_string()),
                        Just("foo".to_string()),
                    ],
                    0..8,
                )
            ) {
                let registry = server_registry();
                let normalized = normalize(&raw, &registry);

                prop_assert_eq!(count_tokens(&normalized), count_tokens(&raw));
                prop_assert!(normalized.len() <= raw.len());
            }
        }
    }
}
