//! The balance cards at the top of both tabs and the export card.

use maud::{Markup, html};

use crate::{
    balance::Balance,
    endpoints::{self, format_endpoint},
    html::{CARD_STYLE, format_currency},
    transaction::TransactionType,
};

/// Renders the net balance, money in and money out cards.
pub(super) fn balance_cards(balance: &Balance) -> Markup {
    let net_style = if balance.net >= 0.0 {
        "text-slate-900 dark:text-white"
    } else {
        "text-rose-500"
    };

    html! {
        section
            id="balance-cards"
            aria-label="Resumo"
            class="grid grid-cols-1 md:grid-cols-3 gap-6 mb-10"
        {
            div class=(CARD_STYLE) data-card="saldo"
            {
                p class="text-xs font-black text-slate-400 uppercase mb-2 tracking-widest"
                {
                    "Saldo Líquido"
                }
                h2 class={ "text-4xl font-black " (net_style) } { (format_currency(balance.net)) }
            }

            div
                class="bg-emerald-50 dark:bg-emerald-950/20 p-6 rounded-3xl border \
                    border-emerald-100 dark:border-emerald-900/30"
                data-card="entradas"
            {
                p class="text-xs font-black text-emerald-600/60 uppercase mb-2 tracking-widest"
                {
                    "Entradas"
                }
                h2 class="text-3xl font-black text-emerald-600" { (format_currency(balance.total_in)) }
            }

            div
                class="bg-rose-50 dark:bg-rose-950/20 p-6 rounded-3xl border \
                    border-rose-100 dark:border-rose-900/30"
                data-card="saidas"
            {
                p class="text-xs font-black text-rose-600/60 uppercase mb-2 tracking-widest"
                {
                    "Saídas"
                }
                h2 class="text-3xl font-black text-rose-600" { (format_currency(balance.total_out)) }
            }
        }
    }
}

/// Renders the card with the CSV download links.
pub(super) fn export_card() -> Markup {
    let income_url = format_endpoint(endpoints::EXPORT_CSV, TransactionType::Income);
    let expense_url = format_endpoint(endpoints::EXPORT_CSV, TransactionType::Expense);

    html! {
        section
            id="export"
            class={ (CARD_STYLE) " flex flex-wrap gap-6 items-center justify-between" }
        {
            div
            {
                h3 class="text-sm font-black uppercase tracking-[0.2em]" { "Relatórios Detalhados" }
                p class="text-xs text-slate-400 font-bold uppercase tracking-tight"
                {
                    "Exportação por itens individuais (CSV)"
                }
            }

            div class="flex flex-wrap gap-4"
            {
                a
                    href=(income_url)
                    download
                    class="px-6 py-3 bg-emerald-500/10 hover:bg-emerald-500/20 text-emerald-600 \
                        dark:text-emerald-400 border border-emerald-500/30 rounded-full text-xs \
                        font-black uppercase"
                {
                    "Exportar Entradas"
                }

                a
                    href=(expense_url)
                    download
                    class="px-6 py-3 bg-rose-500/10 hover:bg-rose-500/20 text-rose-600 \
                        dark:text-rose-400 border border-rose-500/30 rounded-full text-xs \
                        font-black uppercase"
                {
                    "Exportar Saídas"
                }
            }
        }
    }
}
