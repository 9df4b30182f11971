//! ECharts configuration for the Análise tab.
//!
//! - **Fluxo de Caixa**: paid income against paid expenses
//! - **Gastos por Categoria**: a donut of paid expenses by category
//!
//! The options are built with charming and initialised by a small script, in
//! the dark theme when the page is.

use charming::{
    Chart,
    component::{Axis, Grid, Legend},
    datatype::DataPointItem,
    element::{AxisLabel, AxisType, Color, ItemStyle, JsFunction, Tooltip, Trigger},
    series::{Pie, bar::Bar},
};
use maud::PreEscaped;

use crate::{balance::Balance, dashboard::aggregation::CategoryTotal, html::HeadElement};

const INCOME_COLOR: &str = "#10b981";
const EXPENSE_COLOR: &str = "#f43f5e";
const CATEGORY_PALETTE: [&str; 6] = [
    "#6366f1", "#10b981", "#f59e0b", "#f43f5e", "#ec4899", "#8b5cf6",
];

/// A chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Generates the script that initialises the charts once the page loaded.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    if (!chartDom) {{ return; }}
                    const isDarkMode = document.documentElement.classList.contains('dark');
                    const chart = echarts.init(chartDom, isDarkMode ? 'dark' : null, {{ renderer: 'svg' }});
                    const option = {};
                    option.backgroundColor = 'transparent';
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

pub(super) fn cash_flow_chart(balance: &Balance) -> Chart {
    Chart::new()
        .tooltip(currency_tooltip(Trigger::Axis))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(vec!["Entradas", "Saídas"]),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Bar::new().name("Valor").data(vec![
            DataPointItem::new(balance.total_in)
                .name("Entradas")
                .item_style(ItemStyle::new().color(INCOME_COLOR)),
            DataPointItem::new(balance.total_out)
                .name("Saídas")
                .item_style(ItemStyle::new().color(EXPENSE_COLOR)),
        ]))
}

/// A donut of `categories`, which should already be sorted largest first.
pub(super) fn category_chart(categories: &[CategoryTotal]) -> Chart {
    let data = categories
        .iter()
        .map(|category| DataPointItem::new(category.value).name(category.name.as_str()))
        .collect::<Vec<_>>();

    Chart::new()
        .color(
            CATEGORY_PALETTE
                .iter()
                .map(|color| Color::from(*color))
                .collect(),
        )
        .tooltip(currency_tooltip(Trigger::Item))
        .legend(Legend::new().bottom(0))
        .series(
            Pie::new()
                .name("Gastos")
                .radius(vec!["55%", "75%"])
                .data(data),
        )
}

fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('pt-BR', {
              style: 'currency',
              currency: 'BRL'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

fn currency_tooltip(trigger: Trigger) -> Tooltip {
    Tooltip::new()
        .trigger(trigger)
        .value_formatter(currency_formatter())
}

#[cfg(test)]
mod tests {
    use crate::{balance::Balance, dashboard::aggregation::CategoryTotal};

    use super::{cash_flow_chart, category_chart};

    #[test]
    fn cash_flow_chart_colors_income_and_expenses() {
        let options = cash_flow_chart(&Balance {
            total_in: 1500.0,
            total_out: 320.5,
            net: 1179.5,
        })
        .to_string();

        assert!(options.contains("#10b981"), "{options}");
        assert!(options.contains("#f43f5e"), "{options}");
        assert!(options.contains("320.5"), "{options}");
        assert!(options.contains("Saídas"), "{options}");
    }

    #[test]
    fn category_chart_lists_categories() {
        let options = category_chart(&[
            CategoryTotal {
                name: "MERCADO".to_owned(),
                value: 300.0,
            },
            CategoryTotal {
                name: "LAZER".to_owned(),
                value: 250.0,
            },
        ])
        .to_string();

        let mercado = options.find("MERCADO").expect("MERCADO missing");
        let lazer = options.find("LAZER").expect("LAZER missing");
        assert!(mercado < lazer, "{options}");
        assert!(options.contains("pie"), "{options}");
    }
}
