//! LaTeX rendering of the comparison table.

use itertools::Itertools;
use log::debug;

use crate::config::Config;
use crate::error::Result;
use crate::matrix::AggregateMatrix;
use crate::stats::SectionStats;

/// Cycle counts are shown in thousands
const DISPLAY_SCALE: f64 = 1000.0;

/// Renders the report for `matrix` as a LaTeX `table*` fragment.
///
/// Sections appear in configured order, each restricted to the
/// implementations that have measurements; a section left without rows is
/// omitted. Fails without producing output when an implementation lacks
/// display metadata or a measurement on one of the hosts.
pub fn render(config: &Config, matrix: &AggregateMatrix) -> Result<String> {
    let hosts = config.host_ids().collect::<Vec<_>>();

    let mut header = vec!["Implementation".to_owned(), "Language".to_owned()];
    header.extend(
        config
            .hosts
            .iter()
            .map(|host| escape(&host.name)),
    );
    header.push("Geo.\\ mean".to_owned());

    let mut sections = Vec::new();
    for section in &config.sections {
        let Some(stats) = SectionStats::compute(section, matrix, &hosts)? else {
            continue;
        };

        let mut rows = Vec::with_capacity(stats.rows.len());
        for row in &stats.rows {
            let implementation = config.implementation(row.implementation)?;
            if let Some(measured) = matrix.row(row.implementation) {
                for &host in &hosts {
                    if let Some(best) = measured.best(host) {
                        debug!(
                            "{} on {host}: {} cycles ({} {})",
                            row.implementation, best.cycles, best.compiler, best.flags
                        );
                    }
                }
            }
            let mut cells = vec![
                escape(&implementation.name),
                escape(&config.language_label(section, row.implementation)?),
            ];
            cells.extend(
                row.cycles
                    .iter()
                    .zip(&stats.column_minimums)
                    .map(|(&cycles, &minimum)| value_cell(cycles as f64, minimum as f64)),
            );
            cells.push(value_cell(row.mean, stats.best_mean));
            rows.push(cells);
        }

        sections.push(RenderedSection {
            heading: escape(&section.heading),
            rows,
        });
    }

    Ok(Table { header, sections }.to_latex(config))
}

/// Formats `value` in thousands, in bold when it is the `best` of its
/// column, followed by its ratio to `best`.
pub fn value_cell(value: f64, best: f64) -> String {
    let scaled = format!("{:.1}k", value / DISPLAY_SCALE);
    let shown = match value == best {
        true => format!("\\textbf{{{scaled}}}"),
        false => scaled,
    };
    format!("{shown} ({:.2}x)", value / best)
}

/// Escapes the characters LaTeX treats specially in text mode
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '\\' => out.push_str("\\textbackslash{}"),
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            _ => out.push(c),
        }
    }
    out
}

struct RenderedSection {
    heading: String,
    rows: Vec<Vec<String>>,
}

/// The table's cells, before layout
struct Table {
    header: Vec<String>,
    sections: Vec<RenderedSection>,
}

impl Table {
    fn to_latex(&self, config: &Config) -> String {
        let widths = self.column_widths();
        let line = |cells: &[String]| {
            let padded = cells
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:<width$}"))
                .join(" & ");
            format!("  & {} \\\\\n", padded.trim_end())
        };

        let mut out = String::new();
        out.push_str("\\begin{table*}\n");
        out.push_str("\\centering\n");
        out.push_str(&format!("\\caption{{{}}}\n", config.caption));
        out.push_str(&format!("\\label{{{}}}\n", config.label));
        out.push_str(&format!(
            "\\begin{{tabular}}{{lll{}}}\n",
            "r".repeat(self.header.len() - 2)
        ));
        out.push_str("\\toprule\n");
        out.push_str(&line(&self.header));

        for section in &self.sections {
            out.push_str("\\midrule\n");
            out.push_str(&format!(
                "\\multirow{{{}}}{{*}}{{\\rotatebox[origin=c]{{90}}{{{}}}}}\n",
                section.rows.len(),
                section.heading
            ));
            for row in &section.rows {
                out.push_str(&line(row));
            }
        }

        out.push_str("\\bottomrule\n");
        out.push_str("\\end{tabular}\n");
        out.push_str("\\par\\smallskip\n");
        out.push_str(&format!("{{\\footnotesize {}}}\n", config.note));
        out.push_str("\\end{table*}\n");
        out
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths = self
            .header
            .iter()
            .map(|cell| cell.chars().count())
            .collect::<Vec<_>>();
        for row in self
            .sections
            .iter()
            .flat_map(|section| &section.rows)
        {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
        widths
    }
}
