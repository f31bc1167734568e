use afl::fuzz;
use rand::{rngs::StdRng, Rng, SeedableRng};
use regex_tester::{
    analyze_backreferences, explain_regex, generate_replacement_diff, parse_capture_groups,
    DiffConfig, FlagSet, RegexTester, TestRequest, TesterConfig,
};
use std::time::Duration;

#[cfg(not(feature = "manual_test"))]
fn main() {
    fuzz!(|data: &[u8]| {
        run_raw_fuzz(data);
    });
}

#[cfg(feature = "manual_test")]
fn main() {
    use std::io::{stdin, Read};

    let mut input = vec![];
    stdin().read_to_end(&mut input).unwrap();
    run_raw_fuzz(&input);
}

fn fuzz_tester() -> RegexTester {
    RegexTester::new(
        TesterConfig::default()
            .with_timeout(Duration::from_millis(200))
            .with_backtrack_limit(100_000),
    )
}

fn split_bytes_once(input: &[u8]) -> Option<(&[u8], &[u8])> {
    let i = input.iter().position(|b| *b == b',')?;
    Some((&input[0..i], &input[i + 1..]))
}

/// Input layout: `pattern,test string,replacement,seed`.
fn run_raw_fuzz(bytes: &[u8]) -> Option<()> {
    let (pattern, bytes) = split_bytes_once(bytes)?;
    let (input, bytes) = split_bytes_once(bytes)?;
    let (replacement, rand_seed) = split_bytes_once(bytes)?;

    let pattern = std::str::from_utf8(pattern).ok()?;
    let input = std::str::from_utf8(input).ok()?;
    let replacement = std::str::from_utf8(replacement).ok()?;

    let mut rng_seed: u64 = 0;
    for byte in rand_seed.iter().take(8) {
        rng_seed = (rng_seed << 8) + *byte as u64;
    }

    let mut rng = StdRng::seed_from_u64(rng_seed);
    run_fuzz(&fuzz_tester(), pattern, input, replacement, &mut rng);
    Some(())
}

fn gen_flags(rng: &mut StdRng) -> FlagSet {
    FlagSet {
        global: rng.gen_bool(0.5),
        case_insensitive: rng.gen_bool(0.3),
        multiline: rng.gen_bool(0.3),
        dot_all: rng.gen_bool(0.3),
        unicode: rng.gen_bool(0.2),
        sticky: rng.gen_bool(0.2),
        unicode_sets: rng.gen_bool(0.1),
        has_indices: rng.gen_bool(0.2),
    }
}

fn run_fuzz(tester: &RegexTester, pattern: &str, input: &str, replacement: &str, rng: &mut StdRng) {
    let flags = gen_flags(rng);

    #[cfg(feature = "manual_test")]
    {
        println!("Pattern: {:?}", pattern);
        println!("Input: {:?}", input);
        println!("Replacement: {:?}", replacement);
        println!("Flags: {:?}", flags);
    }

    let groups = parse_capture_groups(pattern);
    let pattern_len = pattern.chars().count();
    for group in &groups {
        assert!(group.start < group.end && group.end <= pattern_len);
    }
    let _ = explain_regex(pattern, &flags);

    for reference in analyze_backreferences(replacement) {
        assert!(reference.position < replacement.chars().count());
    }

    let request = TestRequest::new(pattern, input, flags).with_replacement(replacement);
    let result = tester.test(&request);

    #[cfg(feature = "manual_test")]
    println!("Result: {:?}", result);

    if !result.is_valid {
        assert!(result.matches.is_empty());
        assert!(result.error.is_some());
    }
    assert_eq!(result.match_count, result.matches.len());

    let input_len = input.chars().count();
    for record in &result.matches {
        assert!(record.end() <= input_len);
    }

    if let Some(replaced) = &result.replaced_text {
        let spans = generate_replacement_diff(input, replaced, &DiffConfig::default());
        assert!(!spans.is_empty() || (input.is_empty() && replaced.is_empty()));
    }
}
