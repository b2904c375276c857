//! Benchmarks for markdown rendering throughput.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use quill_renderer::render;

/// Generate post-shaped markdown with the given number of sections.
fn generate_post(sections: usize, paragraphs_per_section: usize) -> String {
    let mut md = String::with_capacity(sections * paragraphs_per_section * 220);
    md.push_str("# Post Title\n\n");

    for i in 0..sections {
        md.push_str(&format!("## Section {i}\n\n"));
        for j in 0..paragraphs_per_section {
            md.push_str(&format!(
                "Paragraph {j} in section {i} with **bold**, *italic*, `inline code` \
                 and a [link](https://example.com/{i}/{j}).\n\n"
            ));
        }
        md.push_str(&format!("![figure {i}](https://example.com/fig-{i}.png)\n\n"));
        md.push_str("```\nfn main() {\n    println!(\"hi\");\n}\n```\n\n");
    }
    md
}

fn bench_render_simple(c: &mut Criterion) {
    c.bench_function("render_simple_post", |b| {
        b.iter(|| render("# Hello\n\nSimple content with **bold** text."));
    });
}

fn bench_render_varying_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_post_sizes");
    for sections in [1, 10, 50] {
        let markdown = generate_post(sections, 3);
        group.throughput(Throughput::Bytes(markdown.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(sections),
            &markdown,
            |b, md| b.iter(|| render(md)),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_render_simple, bench_render_varying_sizes);
criterion_main!(benches);
