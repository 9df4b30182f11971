//! Route handlers for the Início and Análise tabs.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::NoticeQuery,
    balance::{Balance, compute_balance},
    dashboard::{
        aggregation::expenses_by_category,
        cards::{balance_cards, export_card},
        charts::{DashboardChart, cash_flow_chart, category_chart, charts_script},
        list::{filter_bar, transaction_list},
    },
    endpoints,
    filters::{TransactionFilter, category_options},
    html::{CARD_STYLE, HeadElement, PAGE_CONTAINER_STYLE, page},
    navigation::NavBar,
    preferences::{Preferences, get_preferences},
    transaction::{Transaction, get_transactions_for_user},
    user::UserID,
};

/// The state needed for the Início and Análise tabs.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading the user's transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// What both tabs read from the database.
struct DashboardData {
    transactions: Vec<Transaction>,
    preferences: Preferences,
}

fn load_dashboard_data(
    state: &DashboardState,
    user_id: UserID,
) -> Result<DashboardData, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_transactions_for_user(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;
    let preferences = get_preferences(user_id, &connection)?;

    Ok(DashboardData {
        transactions,
        preferences,
    })
}

/// Display the Início tab: the balance cards, the filtered transaction list
/// and the export buttons.
///
/// The balance always covers every transaction, the filter only narrows the
/// list.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
    Query(filter): Query<TransactionFilter>,
    Query(notice): Query<NoticeQuery>,
) -> Result<Response, Error> {
    let data = load_dashboard_data(&state, user_id)?;

    let balance = compute_balance(&data.transactions);
    let filtered = filter.apply(&data.transactions);
    let categories = category_options(&data.transactions);

    let content = html! {
        (NavBar::new(endpoints::DASHBOARD_VIEW).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-7xl mx-auto pb-28 lg:pb-8"
            {
                (new_transaction_header())
                (balance_cards(&balance))
                (filter_bar(&filter, &categories))
                (transaction_list(&filter, &filtered))

                div class="mt-10" { (export_card()) }
            }
        }
    };

    Ok(page(
        "Início",
        &[],
        &content,
        data.preferences,
        notice.alerta.map(|notice| notice.into_alert()),
    )
    .into_response())
}

/// Display the Análise tab: the balance cards, the cash flow and category
/// charts, and the export buttons.
pub async fn get_analytics_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let data = load_dashboard_data(&state, user_id)?;

    let balance = compute_balance(&data.transactions);
    let categories = expenses_by_category(&data.transactions);

    let mut charts = vec![DashboardChart {
        id: "cash-flow-chart",
        options: cash_flow_chart(&balance).to_string(),
    }];
    if !categories.is_empty() {
        charts.push(DashboardChart {
            id: "category-chart",
            options: category_chart(&categories).to_string(),
        });
    }

    let content = html! {
        (NavBar::new(endpoints::ANALYTICS_VIEW).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-7xl mx-auto space-y-10 pb-28 lg:pb-8"
            {
                (balance_cards(&balance))
                (analytics_charts(&balance, categories.is_empty()))
                (export_card())
            }
        }
    };

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(&charts),
    ];

    Ok(page("Análise", &scripts, &content, data.preferences, None).into_response())
}

fn new_transaction_header() -> Markup {
    html! {
        div class="flex items-center justify-between mb-8"
        {
            h2 class="text-2xl font-black uppercase tracking-tighter" { "Início" }

            a
                href=(endpoints::NEW_TRANSACTION_VIEW)
                class="px-6 py-3 bg-indigo-600 hover:bg-indigo-700 text-white rounded-full \
                    text-xs font-black uppercase tracking-widest"
            {
                "+ Novo Registro"
            }
        }
    }
}

fn analytics_charts(balance: &Balance, has_no_expenses: bool) -> Markup {
    html! {
        section id="charts" class="grid grid-cols-1 lg:grid-cols-2 gap-8"
        {
            div class=(CARD_STYLE)
            {
                h3 class="text-sm font-black uppercase tracking-[0.2em] mb-6" { "Fluxo de Caixa" }

                @if balance.total_in == 0.0 && balance.total_out == 0.0 {
                    p class="text-xs font-black uppercase text-slate-400 mb-4" { "Sem movimentações liquidadas" }
                }

                div id="cash-flow-chart" class="min-h-[300px]" {}
            }

            div class=(CARD_STYLE)
            {
                h3 class="text-sm font-black uppercase tracking-[0.2em] mb-6" { "Gastos por Categoria" }

                @if has_no_expenses {
                    p
                        id="no-expenses"
                        class="h-[300px] flex items-center justify-center text-xs font-black \
                            uppercase tracking-[0.3em] text-slate-400"
                    {
                        "Sem dados de gastos"
                    }
                } @else {
                    div id="category-chart" class="min-h-[300px]" {}
                }
            }
        }
    }
}
