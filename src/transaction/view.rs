//! The markup of the transaction form shared by the new and edit pages and
//! by the endpoints that re-render parts of it.

use maud::{Markup, html};

use crate::{
    alert::Alert,
    database_id::TransactionId,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_CHECKBOX_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        currency_input_styles, format_currency, loading_spinner, page,
    },
    navigation::NavBar,
    preferences::Preferences,
    transaction::{
        core::{PaymentType, TransactionItem, TransactionType},
        form::{ItemFields, TransactionForm},
    },
};

/// Where the form is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Create,
    Edit(TransactionId),
}

/// The element swapped out when the form fields are re-rendered.
///
/// Refreshes send the form url-encoded so the receipt image is not uploaded
/// again on every change.
const REFRESH_TARGET: &str = "#transaction-fields";

/// Render the full page with the transaction form.
pub fn transaction_form_page(
    form: &TransactionForm,
    suggestions: &[String],
    action: FormAction,
    preferences: Preferences,
    alert: Option<Alert>,
) -> Markup {
    let (title, nav_endpoint) = match action {
        FormAction::Create => ("Novo Registro", endpoints::NEW_TRANSACTION_VIEW),
        FormAction::Edit(_) => ("Editar Registro", endpoints::EDIT_TRANSACTION_VIEW),
    };
    let put_url = match action {
        FormAction::Create => None,
        FormAction::Edit(id) => Some(endpoints::format_endpoint(endpoints::TRANSACTION, id)),
    };
    let post_url = put_url.is_none().then_some(endpoints::TRANSACTIONS_API);

    let content = html! {
        (NavBar::new(nav_endpoint).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            form
                id="transaction-form"
                hx-post=[post_url]
                hx-put=[put_url]
                hx-encoding="multipart/form-data"
                hx-target-error="#alert-container"
                hx-indicator="#indicator"
                class="w-full max-w-4xl mx-auto space-y-8 pb-28 lg:pb-8"
            {
                h2 class="text-2xl font-black uppercase tracking-tighter" { (title) }

                (transaction_fields(form, suggestions))

                (receipt_section(form.receipt_url.as_deref()))

                div class="flex gap-6"
                {
                    a href=(endpoints::DASHBOARD_VIEW) class=(BUTTON_SECONDARY_STYLE)
                    {
                        span class="flex justify-center" { "Cancelar" }
                    }

                    button type="submit" id="indicator" class=(BUTTON_PRIMARY_STYLE)
                    {
                        span class="inline htmx-indicator" { (loading_spinner()) }
                        " Confirmar"
                    }
                }
            }
        }
    };

    page(
        title,
        &[currency_input_styles()],
        &content,
        preferences,
        alert,
    )
}

/// Render the part of the form that depends on the transaction type and
/// boleto mode.
///
/// This is swapped in whole whenever the type, boleto flag or payment type
/// changes, and after a receipt scan.
pub fn transaction_fields(form: &TransactionForm, suggestions: &[String]) -> Markup {
    let is_income = form.transaction_type == TransactionType::Income;
    let shows_items = !is_income && !form.is_boleto;
    let type_button_style = |is_selected: bool, colour: &str| {
        if is_selected {
            format!(
                "px-8 py-2.5 rounded-xl text-[11px] font-black uppercase cursor-pointer \
                bg-white dark:bg-slate-700 shadow-xl {colour}"
            )
        } else {
            "px-8 py-2.5 rounded-xl text-[11px] font-black uppercase cursor-pointer \
            text-slate-400 dark:text-slate-600"
                .to_owned()
        }
    };

    html! {
        div id="transaction-fields" class="space-y-8"
        {
            div class="flex flex-wrap items-center justify-between gap-6"
            {
                fieldset
                    class="flex bg-slate-100 dark:bg-slate-800/50 p-1.5 rounded-2xl border
                    border-slate-200 dark:border-slate-700/50"
                {
                    legend class="sr-only" { "Tipo" }

                    @for transaction_type in [TransactionType::Income, TransactionType::Expense] {
                        @let is_selected = form.transaction_type == transaction_type;
                        @let colour = match transaction_type {
                            TransactionType::Income => "text-emerald-600 dark:text-emerald-400",
                            TransactionType::Expense => "text-rose-600 dark:text-rose-400",
                        };

                        label class=(type_button_style(is_selected, colour))
                        {
                            input
                                type="radio"
                                name="transaction_type"
                                value=(transaction_type.as_str())
                                checked[is_selected]
                                class="sr-only"
                                hx-post=(endpoints::TRANSACTION_FORM)
                                hx-trigger="change"
                                hx-target=(REFRESH_TARGET)
                                hx-swap="outerHTML"
                                hx-include="closest form"
                                hx-encoding="application/x-www-form-urlencoded";

                            (transaction_type.label())
                        }
                    }
                }

                div class="flex flex-wrap items-center gap-4"
                {
                    label class="flex items-center gap-2 text-[11px] font-black uppercase"
                    {
                        input
                            type="checkbox"
                            name="is_paid"
                            value="true"
                            checked[form.is_paid]
                            class=(FORM_CHECKBOX_STYLE);
                        "Liquidado"
                    }

                    label class="flex items-center gap-2 text-[11px] font-black uppercase"
                    {
                        input
                            type="checkbox"
                            name="is_recurring"
                            value="true"
                            checked[form.is_recurring]
                            class=(FORM_CHECKBOX_STYLE);
                        "Recorrente"
                    }

                    @if !is_income {
                        label class="flex items-center gap-2 text-[11px] font-black uppercase tracking-widest"
                        {
                            input
                                type="checkbox"
                                name="is_boleto"
                                value="true"
                                checked[form.is_boleto]
                                class=(FORM_CHECKBOX_STYLE)
                                hx-post=(endpoints::TRANSACTION_FORM)
                                hx-trigger="change"
                                hx-target=(REFRESH_TARGET)
                                hx-swap="outerHTML"
                                hx-include="closest form"
                                hx-encoding="application/x-www-form-urlencoded";

                            @if form.is_boleto { "Modo Boleto Ativo" } @else { "Pagar como Boleto?" }
                        }
                    }
                }
            }

            @if shows_items {
                (scanner_section())
            }

            div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-6"
            {
                div class="sm:col-span-2"
                {
                    label for="description" class=(FORM_LABEL_STYLE) { "Identificação / Nome da Loja" }

                    input
                        type="text"
                        name="description"
                        id="description"
                        list="description-list"
                        placeholder="EX: COMPRAS SUPERMERCADO"
                        value=(form.description)
                        class=(FORM_TEXT_INPUT_STYLE);

                    datalist id="description-list"
                    {
                        @for suggestion in suggestions {
                            option value=(suggestion) {}
                        }
                    }
                }

                (amount_field(form, false))

                div
                {
                    label for="category" class=(FORM_LABEL_STYLE) { "Categoria" }

                    input
                        type="text"
                        name="category"
                        id="category"
                        value=(form.category)
                        readonly[is_income || form.is_boleto]
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="date" class=(FORM_LABEL_STYLE)
                    {
                        @if form.is_boleto { "Data do Pagamento" } @else { "Data" }
                    }

                    input
                        type="date"
                        name="date"
                        id="date"
                        value=(form.date)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                @if form.is_boleto {
                    div
                    {
                        label for="due_date" class=(FORM_LABEL_STYLE) { "Data de Vencimento" }

                        input
                            type="date"
                            name="due_date"
                            id="due_date"
                            value=(form.due_date)
                            required
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                div
                {
                    label for="time" class=(FORM_LABEL_STYLE) { "Horário" }

                    input
                        type="time"
                        name="time"
                        id="time"
                        value=(form.time)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="payment_type" class=(FORM_LABEL_STYLE) { "Forma Pagto" }

                    select
                        name="payment_type"
                        id="payment_type"
                        class=(FORM_TEXT_INPUT_STYLE)
                        hx-post=(endpoints::TRANSACTION_FORM)
                        hx-trigger="change"
                        hx-target=(REFRESH_TARGET)
                        hx-swap="outerHTML"
                        hx-include="closest form"
                        hx-encoding="application/x-www-form-urlencoded"
                    {
                        @for payment_type in PaymentType::ALL {
                            option
                                value=(payment_type.as_str())
                                selected[payment_type == form.payment_type]
                            {
                                (payment_type.label())
                            }
                        }
                    }
                }

                @if form.payment_type.shows_account() {
                    div
                    {
                        label for="account" class=(FORM_LABEL_STYLE) { "Origem/Banco" }

                        input
                            type="text"
                            name="account"
                            id="account"
                            placeholder="EX: NUBANK"
                            value=(form.account)
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }
            }

            div
            {
                label for="observations" class=(FORM_LABEL_STYLE) { "Observações" }

                textarea
                    name="observations"
                    id="observations"
                    placeholder="Deseja adicionar algum comentário extra?"
                    class={ (FORM_TEXT_INPUT_STYLE) " min-h-[140px] resize-none" }
                {
                    (form.observations)
                }
            }

            @if shows_items {
                (items_section(&form.complete_items()))
            }
        }
    }
}

/// The amount input, read-only when the amount is the sum of the items.
///
/// With `out_of_band` set it replaces the amount input already on the page.
pub fn amount_field(form: &TransactionForm, out_of_band: bool) -> Markup {
    let is_computed = form.is_amount_computed();

    html! {
        div id="amount-field" hx-swap-oob=[out_of_band.then_some("true")]
        {
            label for="amount" class=(FORM_LABEL_STYLE)
            {
                "Valor Total"
                @if is_computed { " (AUTO)" }
            }

            div class="input-wrapper w-full"
            {
                input
                    type="number"
                    name="amount"
                    id="amount"
                    step="0.01"
                    min="0"
                    placeholder="0.00"
                    value=(form.display_amount())
                    readonly[is_computed]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }
    }
}

fn scanner_section() -> Markup {
    html! {
        div
            class="p-6 bg-indigo-600 dark:bg-indigo-700 rounded-3xl flex flex-wrap gap-4
            items-center justify-between shadow-xl text-white"
        {
            div
            {
                p class="font-black text-sm uppercase tracking-tight" { "Scanner Inteligente" }
                p class="text-[11px] opacity-80 uppercase font-bold tracking-widest"
                {
                    "Extrair dados do cupom fiscal"
                }
            }

            label
                id="scan-indicator"
                class="bg-white text-indigo-600 px-7 py-3.5 rounded-2xl font-black
                text-[11px] uppercase tracking-widest cursor-pointer"
            {
                span class="htmx-indicator" { (loading_spinner()) }
                "Abrir Câmera"

                input
                    type="file"
                    name="scan_image"
                    accept="image/*"
                    capture="environment"
                    class="hidden"
                    hx-post=(endpoints::SCAN_RECEIPT)
                    hx-trigger="change"
                    hx-target=(REFRESH_TARGET)
                    hx-swap="outerHTML"
                    hx-include="closest form"
                    hx-encoding="multipart/form-data"
                    hx-indicator="#scan-indicator";
            }
        }
    }
}

fn items_section(items: &[TransactionItem]) -> Markup {
    html! {
        div class="space-y-6 pt-6 border-t border-slate-100 dark:border-slate-800"
        {
            h3 class="text-[13px] font-black uppercase tracking-[0.25em]"
            {
                "Detalhamento de Itens da Compra"
            }

            (item_entry_row(false))

            div class="overflow-x-auto border border-slate-200 dark:border-slate-800 rounded-3xl"
            {
                table class="w-full text-left text-sm"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th class=(TABLE_CELL_STYLE) { "Item" }
                            th class={ (TABLE_CELL_STYLE) " text-right" } { "Preço" }
                            th class={ (TABLE_CELL_STYLE) " text-center" } { "QTDE" }
                            th class={ (TABLE_CELL_STYLE) " text-center" } { "Nec." }
                            th class={ (TABLE_CELL_STYLE) " text-right" } { "Total" }
                            th class={ (TABLE_CELL_STYLE) " text-center" } { "Ação" }
                        }
                    }

                    tbody id="item-rows" class="divide-y divide-slate-50 dark:divide-slate-800"
                    {
                        @if items.is_empty() {
                            (no_items_row())
                        }

                        @for item in items {
                            (item_row(item))
                        }
                    }
                }
            }
        }
    }
}

fn no_items_row() -> Markup {
    html! {
        tr id="no-items"
        {
            td
                colspan="6"
                class="px-8 py-12 text-center text-slate-300 dark:text-slate-600 font-black
                uppercase tracking-[0.3em] text-[11px]"
            {
                "Nenhum item na lista"
            }
        }
    }
}

/// The inputs for adding an item. They are not part of the submitted items
/// and are cleared by swapping this row out after an item is added.
pub fn item_entry_row(out_of_band: bool) -> Markup {
    html! {
        div
            id="item-entry"
            hx-swap-oob=[out_of_band.then_some("true")]
            class="flex flex-col sm:flex-row gap-4 p-5 rounded-3xl border-2 bg-slate-50
            dark:bg-slate-900/50 border-slate-100 dark:border-slate-800 sm:items-end"
        {
            div class="flex-1"
            {
                label for="new_item_name" class=(FORM_LABEL_STYLE) { "Nome do Item" }
                input
                    type="text"
                    name="new_item_name"
                    id="new_item_name"
                    placeholder="EX: FILÉ MIGNON"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="sm:w-32"
            {
                label for="new_item_price" class=(FORM_LABEL_STYLE) { "Preço Unit." }
                input
                    type="number"
                    name="new_item_price"
                    id="new_item_price"
                    step="0.01"
                    placeholder="0,00"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="sm:w-20"
            {
                label for="new_item_quantity" class=(FORM_LABEL_STYLE) { "QTDE" }
                input
                    type="number"
                    name="new_item_quantity"
                    id="new_item_quantity"
                    step="any"
                    placeholder="1"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="sm:w-24"
            {
                label for="new_item_necessary" class=(FORM_LABEL_STYLE) { "Nec." }
                (necessity_select("new_item_necessary", true))
            }

            button
                type="button"
                hx-post=(endpoints::TRANSACTION_ITEM)
                hx-include="closest form"
                hx-encoding="application/x-www-form-urlencoded"
                hx-target="#item-rows"
                hx-swap="beforeend"
                class="bg-indigo-600 hover:bg-indigo-700 text-white px-7 py-3 rounded-2xl
                font-black text-lg"
                aria-label="Adicionar item"
            {
                "+"
            }
        }
    }
}

fn necessity_select(name: &str, is_necessary: bool) -> Markup {
    html! {
        select name=(name) class=(FORM_TEXT_INPUT_STYLE)
        {
            option value="sim" selected[is_necessary] { "Sim" }
            option value="nao" selected[!is_necessary] { "Não" }
        }
    }
}

/// A row of the item table. The hidden inputs carry the item when the form
/// is submitted.
pub fn item_row(item: &TransactionItem) -> Markup {
    let fields = ItemFields::from(item);

    html! {
        tr class="hover:bg-slate-50/50 dark:hover:bg-slate-800/30"
        {
            td class={ (TABLE_CELL_STYLE) " font-bold uppercase" }
            {
                (item.name)
                input type="hidden" name="item_name" value=(fields.name);
                input type="hidden" name="item_price" value=(fields.price);
                input type="hidden" name="item_quantity" value=(fields.quantity);
            }
            td class={ (TABLE_CELL_STYLE) " text-right" } { (format_currency(item.price)) }
            td class={ (TABLE_CELL_STYLE) " text-center font-black" } { (fields.quantity) }
            td class={ (TABLE_CELL_STYLE) " text-center" }
            {
                (necessity_select("item_necessary", item.is_necessary))
            }
            td class={ (TABLE_CELL_STYLE) " text-right font-black" } { (format_currency(item.total)) }
            td class={ (TABLE_CELL_STYLE) " text-center" }
            {
                button
                    type="button"
                    class="text-slate-300 hover:text-rose-500"
                    aria-label="Remover item"
                    onclick="if (confirm('Remover este item?')) this.closest('tr').remove()"
                {
                    "✕"
                }
            }
        }
    }
}

/// The receipt attached to the transaction and the input to replace it.
///
/// The existing receipt travels back in the hidden `receipt_url` input so
/// that editing other fields keeps it.
fn receipt_section(receipt_url: Option<&str>) -> Markup {
    html! {
        div
        {
            label for="receipt_image" class=(FORM_LABEL_STYLE) { "Comprovante Visual" }

            @if let Some(receipt_url) = receipt_url {
                div id="receipt-preview" class="flex items-center gap-4 mb-4"
                {
                    img src=(receipt_url) alt="Comprovante" class="h-32 rounded-2xl object-cover";
                    input type="hidden" name="receipt_url" value=(receipt_url);

                    button
                        type="button"
                        class="text-[11px] font-black uppercase text-rose-500"
                        onclick="this.closest('#receipt-preview').remove()"
                    {
                        "Remover"
                    }
                }
            }

            input
                type="file"
                name="receipt_image"
                id="receipt_image"
                accept="image/*"
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}
