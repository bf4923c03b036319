//! Benchmarks for tex2model parsing performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic LaTeX and HTML documents.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tex2model::{HtmlTree, LatexTree, MarkupTree};

/// Creates a LaTeX document with the given number of labeled tables.
fn create_test_latex(table_count: usize) -> String {
    let mut content = String::from("\\documentclass{article}\n\\begin{document}\n");

    for i in 0..table_count {
        content.push_str("\\begin{table}[h]\n\\centering\n");
        content.push_str(&format!("\\caption{{Parameters {}}}\\label{{tbl:p{}}}\n", i, i));
        content.push_str("\\begin{tabular}{lll}\n\\hline\nName & Domain & Description \\\\\n\\hline\n");
        for r in 0..20 {
            content.push_str(&format!(
                "$c_{{{r}}}$ & $\\mathbb{{R}}_+$ & cost of item {r} % inline comment\n\\\\\n"
            ));
        }
        content.push_str("\\hline\n\\end{tabular}\n\\end{table}\n\n");
    }

    content.push_str("\\end{document}\n");
    content
}

/// Creates the HTML pandoc would emit for `create_test_latex`.
fn create_test_html(table_count: usize) -> String {
    let mut content = String::from("<!DOCTYPE html><html><body>\n");

    for i in 0..table_count {
        content.push_str(&format!(
            "<div id=\"tbl:p{}\" class=\"table\"><table><thead><tr class=\"header\">",
            i
        ));
        content.push_str("<th>Name</th><th>Domain</th><th>Description</th></tr></thead><tbody>\n");
        for r in 0..20 {
            content.push_str(&format!(
                "<tr><td><span class=\"math inline\">\\(c_{{{r}}}\\)</span></td>\
                 <td>\\(\\mathbb{{R}}_+\\)</td><td>cost of item {r}</td></tr>\n"
            ));
        }
        content.push_str("</tbody></table></div>\n");
    }

    content.push_str("</body></html>\n");
    content
}

/// Benchmark LaTeX parsing and label lookup.
fn bench_latex_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("latex_parsing");

    for table_count in [1, 10, 50].iter() {
        let source = create_test_latex(*table_count);

        group.bench_function(format!("{}_tables", table_count), |b| {
            b.iter(|| {
                let tree = LatexTree::parse(black_box(&source)).unwrap();
                let tables = tree.find_tables();
                tables.iter().filter_map(|t| tree.label_of(t)).count()
            });
        });
    }

    group.finish();
}

/// Benchmark HTML table extraction.
fn bench_html_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("html_extraction");

    for table_count in [1, 10, 50].iter() {
        let html = create_test_html(*table_count);

        group.bench_function(format!("{}_tables", table_count), |b| {
            b.iter(|| {
                let tree = HtmlTree::parse(black_box(&html));
                tree.find_tables()
                    .into_iter()
                    .map(|node| tree.table_data(node).unwrap().row_count())
                    .sum::<usize>()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_latex_parsing, bench_html_extraction);
criterion_main!(benches);
