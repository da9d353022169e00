// Copyright 2026 BadCompany
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use criterion::{criterion_group, criterion_main, Criterion};
use hornet::generator::ValueGenerator;
use hornet::signature::parse;
use std::hint::black_box;

fn bench_signature_parse(c: &mut Criterion) {
    c.bench_function("parse_nested_signature", |b| {
        b.iter(|| parse(black_box("a{s(ia{yv}ax)}")).unwrap())
    });
}

fn bench_value_generation(c: &mut Criterion) {
    let tree = parse("a{sv}").unwrap();
    let generator = ValueGenerator::new(65_536, 7);
    c.bench_function("generate_dict_case_space", |b| {
        b.iter(|| {
            for case in generator.cases(black_box(&tree)) {
                black_box(case);
            }
        })
    });
}

criterion_group!(benches, bench_signature_parse, bench_value_generation);
criterion_main!(benches);
