//! Property tests for the substitution laws.

use envsubst::{Env, Mode, Restrictions, Substituter};
use proptest::prelude::*;

fn restrictions() -> impl Strategy<Value = Restrictions> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(no_unset, no_empty, no_digit, keep_unset, all_errors)| {
            Restrictions::relaxed()
                .with_no_unset(no_unset)
                .with_no_empty(no_empty)
                .with_no_digit(no_digit)
                .with_keep_unset(keep_unset)
                .with_mode(if all_errors { Mode::AllErrors } else { Mode::Quick })
        },
    )
}

fn name() -> impl Strategy<Value = String> {
    "[A-Z][A-Z0-9_]{0,8}"
}

fn sub(env: Env, restrictions: Restrictions) -> Substituter {
    Substituter::new("prop", env, restrictions)
}

proptest! {
    #[test]
    fn text_without_dollar_is_unchanged(input in "[^$]*", r in restrictions()) {
        let out = sub(Env::new(), r).substitute(&input).unwrap();
        prop_assert_eq!(out, input);
    }

    #[test]
    fn escaped_reference_is_literal(prefix in "[^$]{0,10}", n in name(), r in restrictions()) {
        let input = format!("{prefix}$${n}");
        let out = sub(Env::new(), r).substitute(&input).unwrap();
        prop_assert_eq!(out, format!("{prefix}${n}"));
    }

    #[test]
    fn alternate_depends_only_on_being_set(
        n in name(),
        value in proptest::option::of("[a-z ]{0,6}"),
        alt in "[a-z0-9 ./:-]{0,12}",
    ) {
        let mut env = Env::new();
        if let Some(v) = &value {
            env.set(n.clone(), v.clone());
        }
        let out = sub(env, Restrictions::strict()).substitute(&format!("${{{n}+{alt}}}")).unwrap();
        let expected = if value.is_some() { alt } else { String::new() };
        prop_assert_eq!(out, expected);
    }

    #[test]
    fn case_transforms_match_str_methods(n in name(), value in "[a-zA-Z ]{0,16}") {
        let mut env = Env::new();
        env.set(n.clone(), value.clone());
        let s = sub(env, Restrictions::relaxed());
        prop_assert_eq!(s.substitute(&format!("${{{n}^^}}")).unwrap(), value.to_uppercase());
        prop_assert_eq!(s.substitute(&format!("${{{n},,}}")).unwrap(), value.to_lowercase());
    }

    #[test]
    fn keep_unset_round_trips_unset_references(
        prefix in "[^$]{0,10}",
        n in name(),
        braced in any::<bool>(),
    ) {
        let reference = if braced { format!("${{UNSET_{n}}}") } else { format!("$UNSET_{n}") };
        let input = format!("{prefix}{reference} suffix");
        let out = sub(Env::new(), Restrictions::keep_unset()).substitute(&input).unwrap();
        prop_assert_eq!(out, input);
    }

    #[test]
    fn bytes_without_dollar_are_unchanged(
        input in proptest::collection::vec(any::<u8>().prop_filter("no $", |b| *b != b'$'), 0..64),
        r in restrictions(),
    ) {
        let out = sub(Env::new(), r).substitute_bytes(&input).unwrap();
        prop_assert_eq!(out, input);
    }

    #[test]
    fn invalid_bytes_survive_substitution(
        head in proptest::collection::vec(0x80u8..=0xff, 0..8),
        tail in proptest::collection::vec(0x80u8..=0xff, 0..8),
    ) {
        let mut input = head.clone();
        input.extend_from_slice(b"[$BAR]");
        input.extend_from_slice(&tail);
        let mut expected = head;
        expected.extend_from_slice(b"[bar]");
        expected.extend_from_slice(&tail);

        let env = Env::from_entries(["BAR=bar"]);
        let out = sub(env, Restrictions::relaxed()).substitute_bytes(&input).unwrap();
        prop_assert_eq!(out, expected);
    }

    #[test]
    fn arbitrary_input_never_panics(input in ".{0,64}", r in restrictions()) {
        let env = Env::from_entries(["BAR=bar", "EMPTY="]);
        let _ = sub(env, r).substitute(&input);
    }
}
