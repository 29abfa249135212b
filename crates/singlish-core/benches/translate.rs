use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use singlish_core::compose::compose;
use singlish_core::rules::RuleTable;
use singlish_core::Transliterator;

static INPUTS: &[(&str, &str)] = &[
    ("short", "mama gedhara yanavaa."),
    (
        "mixed",
        "api kohendha kannea adha? KFC eken kamudha? naethnam PIZZA HUT eken kamudha?",
    ),
    (
        "long",
        "varthamaana thaakShaNika yugayeedhii parigaNakaya haa jQQgama dhurakaThanaya \
         manuShYA jiivithayee athYAvashYA kotasak vii thibee. dhinen dhina varDhanaya \
         vana thaakShaNaya magin aDhYaapanaya, vYaapaaraya, sanniveedhanaya saha \
         vinoodhaasvaadhaya vaeni kSheethra bohoomayakama kriyaakaariithvaya ithaa \
         pahasu haa veegavath vii aetha.",
    ),
];

fn bench_translate(c: &mut Criterion) {
    let engine = Transliterator::builtin().unwrap();
    let mut group = c.benchmark_group("translate");
    for &(label, text) in INPUTS {
        group.bench_with_input(BenchmarkId::new(label, text.len()), &text, |b, &text| {
            b.iter(|| engine.translate(text));
        });
    }
    group.finish();
}

fn bench_compose(c: &mut Criterion) {
    let table = RuleTable::builtin().unwrap();
    let raw = "ක්රියාකාරීත්වය විද්යාව ප්රශ්නය ".repeat(16);
    c.bench_function("compose/ligatures", |b| {
        b.iter(|| compose(table.ligatures(), &raw));
    });
}

fn bench_table_load(c: &mut Criterion) {
    c.bench_function("rules/load_builtin", |b| {
        b.iter(|| RuleTable::builtin().unwrap());
    });
}

criterion_group!(benches, bench_translate, bench_compose, bench_table_load);
criterion_main!(benches);
