// Copyright 2026 BadCompany
// Licensed under the Apache License, Version 2.0

#![no_main]

use libfuzzer_sys::fuzz_target;
use hornet::signature::parse;

fuzz_target!(|data: &[u8]| {
    // Fuzz the signature parser.
    // We want to ensure that NO input causes a panic: the parser must
    // reject malformed signatures with an error, never by crashing.
    // Logic correctness (which trees come out) is for unit tests.

    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(tree) = parse(text) {
            // A parsed tree must re-serialize to a shape that parses back.
            parse(&tree.signature()).expect("round-trip of a parsed shape");
        }
    }
});
