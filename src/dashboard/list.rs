//! The filter bar and the transaction list on the Início tab.

use maud::{Markup, html};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    endpoints::{self, format_endpoint},
    filters::{KindFilter, StatusFilter, TransactionFilter, active_filters_label},
    html::{
        BUTTON_DELETE_STYLE, CARD_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency, format_date,
    },
    transaction::{Transaction, TransactionType},
};

/// The max number of graphemes to display in the transaction table rows before
/// truncating and displaying ellipses.
const MAX_DESCRIPTION_GRAPHEMES: usize = 32;

/// The filter form. Every change reloads the list, keeping the filter in the
/// address bar.
///
/// `categories` are offered in the category select; the current filter's
/// category is kept as an option even when no transaction uses it anymore.
pub(super) fn filter_bar(filter: &TransactionFilter, categories: &[String]) -> Markup {
    let selected_category = filter.category.trim();
    let keep_stale_category = !selected_category.is_empty()
        && !categories
            .iter()
            .any(|category| category.to_lowercase() == selected_category.to_lowercase());

    let start_date = filter.start_date.map(|date| date.to_string());
    let end_date = filter.end_date.map(|date| date.to_string());

    html! {
        form
            id="filters"
            method="get"
            action=(endpoints::DASHBOARD_VIEW)
            hx-get=(endpoints::DASHBOARD_VIEW)
            hx-trigger="input changed delay:400ms, change"
            hx-select="#transaction-list"
            hx-target="#transaction-list"
            hx-swap="outerHTML"
            hx-push-url="true"
            class="flex flex-wrap items-center gap-4 mb-8"
        {
            input
                type="search"
                name="busca"
                placeholder="PROCURAR..."
                aria-label="Procurar"
                value=(filter.search)
                class={ (FORM_TEXT_INPUT_STYLE) " max-w-xs uppercase" };

            div class="flex items-center gap-2"
            {
                input
                    type="date"
                    name="inicio"
                    aria-label="Data inicial"
                    value=[start_date]
                    class=(FORM_TEXT_INPUT_STYLE);
                span class="text-slate-300 font-bold" { "/" }
                input
                    type="date"
                    name="fim"
                    aria-label="Data final"
                    value=[end_date]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            fieldset class="flex p-1.5 rounded-2xl border border-slate-200 dark:border-slate-800 bg-white dark:bg-slate-900"
            {
                legend class="sr-only" { "Tipo" }

                @for kind in KindFilter::ALL {
                    label class="cursor-pointer"
                    {
                        input
                            type="radio"
                            name="tipo"
                            value=(kind.as_str())
                            checked[kind == filter.kind]
                            class="sr-only peer";
                        span
                            class="block px-5 py-2 rounded-xl text-xs font-black uppercase \
                                text-slate-400 peer-checked:bg-indigo-600 peer-checked:text-white"
                        {
                            (kind.label())
                        }
                    }
                }
            }

            select
                name="status"
                aria-label="Status"
                class={ (FORM_TEXT_INPUT_STYLE) " w-auto text-xs uppercase" }
            {
                @for status in StatusFilter::ALL {
                    option value=(status.as_str()) selected[status == filter.status]
                    {
                        (status.label())
                    }
                }
            }

            select
                name="categoria"
                aria-label="Categoria"
                class={ (FORM_TEXT_INPUT_STYLE) " w-auto text-xs uppercase" }
            {
                option value="" selected[selected_category.is_empty()] { "Categoria: Todas" }

                @if keep_stale_category {
                    option value=(selected_category) selected { (selected_category) }
                }

                @for category in categories {
                    option
                        value=(category)
                        selected[category.to_lowercase() == selected_category.to_lowercase()]
                    {
                        (category)
                    }
                }
            }

            noscript
            {
                button type="submit" class=(LINK_STYLE) { "Filtrar" }
            }

            a
                href=(endpoints::DASHBOARD_VIEW)
                class="px-4 py-2 bg-slate-100 dark:bg-slate-800 hover:bg-rose-500 \
                    hover:text-white rounded-2xl text-xs font-black uppercase text-slate-400 \
                    border border-slate-200 dark:border-slate-700"
            {
                "Resetar"
            }
        }
    }
}

/// The heading and table of the filtered transactions.
pub(super) fn transaction_list(filter: &TransactionFilter, transactions: &[&Transaction]) -> Markup {
    html! {
        section id="transaction-list" class="space-y-6"
        {
            div class="flex items-center gap-3"
            {
                h3 class="text-sm font-black uppercase tracking-[0.2em]" { (filter.heading()) }

                @if filter.is_active() {
                    span
                        id="active-filters"
                        class="bg-indigo-100 dark:bg-indigo-900/30 text-indigo-600 \
                            dark:text-indigo-400 px-3 py-1 rounded-full text-[10px] font-black \
                            uppercase tracking-widest"
                    {
                        (active_filters_label(transactions.len()))
                    }
                }
            }

            div class={ (CARD_STYLE) " overflow-x-auto p-0" }
            {
                table class="w-full text-left text-sm"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Data" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Descrição" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Categoria" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                            th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Valor" }
                            th scope="col" class={ (TABLE_CELL_STYLE) " text-center" } { "Ações" }
                        }
                    }

                    tbody
                    {
                        @for transaction in transactions {
                            (transaction_row(transaction))
                        }

                        @if transactions.is_empty() {
                            tr
                            {
                                td colspan="6" class="px-6 py-16 text-center text-xs font-black uppercase tracking-[0.3em] text-slate-400"
                                {
                                    "Nenhum registro encontrado"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn transaction_row(transaction: &Transaction) -> Markup {
    let (description, full_description) = format_description(&transaction.description);
    let edit_url = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
    let delete_url = format_endpoint(endpoints::TRANSACTION, transaction.id);
    let amount_style = match transaction.transaction_type {
        TransactionType::Income => "text-emerald-600",
        TransactionType::Expense => "text-rose-600",
    };

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
        {
            td class={ (TABLE_CELL_STYLE) " font-bold text-slate-500" } { (format_date(transaction.date)) }
            td
                class={ (TABLE_CELL_STYLE) " font-black uppercase tracking-tight" }
                title=[full_description]
            {
                (description)
            }
            td class=(TABLE_CELL_STYLE)
            {
                span class="bg-slate-100 dark:bg-slate-800 px-3 py-1 rounded-lg text-xs font-black uppercase text-slate-500"
                {
                    (transaction.category)
                }
            }
            td class=(TABLE_CELL_STYLE)
            {
                @if transaction.is_paid {
                    span class="text-xs font-black uppercase text-blue-600 dark:text-blue-400" { "Liquidado" }
                } @else {
                    span class="text-xs font-black uppercase text-amber-600 dark:text-amber-500" { "Em Aberto" }
                }
            }
            td class={ (TABLE_CELL_STYLE) " text-right font-black whitespace-nowrap " (amount_style) }
            {
                (format_currency(transaction.amount))
            }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex items-center justify-center gap-3"
                {
                    a href=(edit_url) class=(LINK_STYLE) { "Editar" }

                    button
                        type="button"
                        hx-delete=(delete_url)
                        hx-confirm="Deseja realmente excluir este registro?"
                        hx-target-error="#alert-container"
                        class=(BUTTON_DELETE_STYLE)
                    {
                        "Excluir"
                    }
                }
            }
        }
    }
}

fn format_description(description: &str) -> (String, Option<&str>) {
    let description_length = description.graphemes(true).count();

    if description_length <= MAX_DESCRIPTION_GRAPHEMES {
        (description.to_owned(), None)
    } else {
        let truncated: String = description
            .graphemes(true)
            .take(MAX_DESCRIPTION_GRAPHEMES - 3)
            .collect();
        (truncated + "...", Some(description))
    }
}
