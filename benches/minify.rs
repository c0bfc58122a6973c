/*!
# Benchmark: `minweb`
*/

use criterion::{
	Criterion,
	criterion_group,
	criterion_main,
};
use minweb::{
	Document,
	FilterOptions,
	Theme,
};
use std::hint::black_box;



/// # Article Fixture.
const ARTICLE: &str = include_str!("../skel/test-assets/article.html");

/// # Blog Fixture.
const BLOG: &str = include_str!("../skel/test-assets/blog.html");



fn parse(c: &mut Criterion) {
	let mut group = c.benchmark_group("minweb::parse");

	for (name, raw) in [("article.html", ARTICLE), ("blog.html", BLOG)] {
		group.bench_function(name, move |b| {
			b.iter(|| minweb::parse(black_box(raw)))
		});
	}

	group.finish();
}

fn minify(c: &mut Criterion) {
	let mut group = c.benchmark_group("minweb::minify");

	let doc = Document::parse(ARTICLE).unwrap();
	let opts = FilterOptions::default()
		.with_url("https://example.com/notes/field.html")
		.with_skip_tags(["script", "img", "svg", "iframe"])
		.with_theme(Theme::Dark)
		.with_inject_style(true);

	group.bench_function("article.html (default)", |b| {
		b.iter(|| minweb::minify(black_box(&doc), &FilterOptions::default()))
	});

	group.bench_function("article.html (everything)", |b| {
		b.iter(|| minweb::minify(black_box(&doc), &opts))
	});

	let opts = opts.with_article_mode(true).with_text_mode(true);
	group.bench_function("article.html (article, text)", |b| {
		b.iter(|| minweb::minify(black_box(&doc), &opts))
	});

	group.finish();
}



criterion_group!(
	benches,
	parse,
	minify,
);
criterion_main!(benches);
