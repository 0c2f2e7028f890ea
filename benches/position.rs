use criterion::{Criterion, criterion_group, criterion_main};

use foyer::{AnsiDriver, Layout, solve};

fn big_layout_text(blocks: usize) -> String {
    let mut text = String::new();
    for idx in 0..blocks {
        text.push_str(&format!(
            "Label {{\n text: \"Section {idx}\" | bold | cyan\n padding-top: 2\n}}\n"
        ));
        text.push_str(&format!(
            "Input {{\n prompt: \"Field {idx} - \"\n placeholder: \"value\" | dim\n margin-left: 4\n}}\n"
        ));
    }
    text
}

fn bench_parse(c: &mut Criterion) {
    let driver = AnsiDriver::new();
    let text = big_layout_text(100);
    c.bench_function("parse_200_widgets", |b| {
        b.iter(|| Layout::parse(&text, &driver).unwrap());
    });
}

fn bench_solve(c: &mut Criterion) {
    let driver = AnsiDriver::new();
    let layout = Layout::parse(&big_layout_text(100), &driver).unwrap();
    c.bench_function("solve_200_widgets", |b| {
        b.iter(|| solve(layout.widgets()));
    });
}

criterion_group!(benches, bench_parse, bench_solve);
criterion_main!(benches);
