use maud::{DOCTYPE, Markup, PreEscaped, html};

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};
use time::Date;

use crate::{alert::Alert, preferences::Preferences};

// Link styles
pub const LINK_STYLE: &str = "text-indigo-600 hover:text-indigo-500 \
    dark:text-indigo-400 dark:hover:text-indigo-300 underline";

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "w-full px-4 py-3 bg-indigo-600 \
    disabled:bg-indigo-800 hover:enabled:bg-indigo-700 text-white rounded-2xl \
    font-black text-xs uppercase tracking-widest shadow-lg";

pub const BUTTON_SECONDARY_STYLE: &str = "w-full py-2.5 px-5 \
    text-xs font-black uppercase tracking-widest text-slate-600 bg-white \
    rounded-2xl border border-slate-200 hover:bg-slate-100 \
    dark:bg-slate-800 dark:text-slate-300 dark:border-slate-700 \
    dark:hover:bg-slate-700";

pub const BUTTON_DELETE_STYLE: &str = "text-rose-600 hover:text-rose-500 \
    dark:text-rose-400 dark:hover:text-rose-300 bg-transparent \
    border-none cursor-pointer";

// Form styles
pub const FORM_CONTAINER_STYLE: &str = "flex flex-col items-center px-6 py-8 \
    mx-auto lg:py-0 max-w-md text-slate-900 dark:text-white";
pub const FORM_LABEL_STYLE: &str = "block mb-2 text-[11px] font-black uppercase \
    tracking-[0.15em] text-slate-400 dark:text-slate-500";
pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full px-4 py-3 rounded-2xl text-sm \
    font-bold text-slate-800 dark:text-white disabled:text-slate-400 bg-white \
    dark:bg-slate-800 border border-slate-200 dark:border-slate-700 \
    dark:placeholder-slate-500 focus:ring-indigo-500 focus:border-indigo-500";
pub const FORM_CHECKBOX_STYLE: &str = "w-5 h-5 rounded-lg border-slate-300 \
    text-indigo-600 focus:ring-indigo-500 cursor-pointer";

// Table styles
pub const TABLE_HEADER_STYLE: &str = "text-xs text-slate-400 uppercase font-black \
    tracking-[0.15em] bg-slate-50 dark:bg-slate-900/50";

pub const TABLE_ROW_STYLE: &str = "bg-white border-b dark:bg-slate-900 dark:border-slate-800";

pub const TABLE_CELL_STYLE: &str = "px-6 py-4";

// Page container
pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col px-4 md:px-8 py-8 mx-auto max-w-screen-xl text-slate-900 dark:text-white";

pub const CARD_STYLE: &str = "bg-white dark:bg-slate-900 p-6 rounded-3xl border \
    border-slate-200 dark:border-slate-800 shadow-sm";

pub enum HeadElement {
    /// The file path or URL to a JavaScript script.
    ScriptLink(String),
    /// JavaScript source code.
    ScriptSource(PreEscaped<String>),
    Style(PreEscaped<String>),
}

/// Render a full page with the default preferences and no alert.
pub fn base(title: &str, head_elements: &[HeadElement], content: &Markup) -> Markup {
    page(
        title,
        head_elements,
        content,
        Preferences::default(),
        None,
    )
}

/// Render a full page using the user's display `preferences`.
///
/// If `alert` is set it is shown on page load in the alert container.
pub fn page(
    title: &str,
    head_elements: &[HeadElement],
    content: &Markup,
    preferences: Preferences,
    alert: Option<Alert>,
) -> Markup {
    let html_class = format!(
        "{} {}",
        preferences.theme.css_class(),
        preferences.font_size.css_class()
    );

    html! {
        (DOCTYPE)
        html lang="pt-BR" class=(html_class.trim())
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Econo" }
                link rel="icon" type="image/png" href="/static/favicon-32x32.png" sizes="32x32";
                link href="/static/main.css" rel="stylesheet";

                script src="/static/htmx-2.0.8-min.js" integrity="sha384-/TgkGk7p307TH7EXJDuUlgG3Ce1UVolAOFopFekQkkXihi5u/6OCvVKyz1W+idaz" {}
                script src="/static/htmx-ext-response-targets-2.0.4.js" integrity="sha384-T41oglUPvXLGBVyRdZsVRxNWnOOqCynaPubjUVjxhsjFTKrFJGEMm3/0KGmNQ+Pg" {}

                style
                {
                    r#"
                    #indicator.htmx-indicator {
                        display: none;
                    }

                    #indicator.htmx-request .htmx-indicator {
                        display: inline;
                    }

                    #indicator.htmx-request.htmx-indicator {
                        display: inline;
                    }

                    html.font-size-sm { font-size: 14px; }
                    html.font-size-md { font-size: 16px; }
                    html.font-size-lg { font-size: 18px; }
                    "#
                }

                @for element in head_elements
                {
                    @match element
                    {
                        HeadElement::ScriptSource(text) => script { (text) }
                        HeadElement::ScriptLink(path) => script src=(path) {}
                        HeadElement::Style(text) => style { (text) }
                    }
                }
            }

            body
                hx-ext="response-targets"
                class="container max-w-full min-h-screen bg-slate-50 dark:bg-slate-950"
            {
                (content)

                @match alert {
                    Some(alert) => {
                        (alert.into_page_markup())
                    }
                    // Alert container for out-of-band swaps
                    None => {
                        div
                            id="alert-container"
                            class="hidden w-full max-w-md px-4"
                            style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
                        {}
                    }
                }
            }
        }
    }
}

pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    // Template adapted from https://flowbite.com/blocks/marketing/404/
    let content = html!(
        section class="bg-white dark:bg-slate-950"
        {
            div class="py-8 px-4 mx-auto max-w-screen-xl lg:py-16 lg:px-6"
            {
                div class="mx-auto max-w-screen-sm text-center"
                {
                    h1
                        class="mb-4 text-7xl tracking-tight font-extrabold
                            lg:text-9xl text-indigo-600 dark:text-indigo-500"
                    {
                        (header)
                    }

                    p
                        class="mb-4 text-3xl md:text-4xl tracking-tight
                            font-bold text-slate-900 dark:text-white"
                    {
                        (description)
                    }

                    p
                        class="mb-4 text-1xl md:text-2xl tracking-tight
                            text-slate-900 dark:text-white"
                    {
                        (fix)
                    }

                    a
                        href="/"
                        class="inline-flex text-white bg-indigo-600
                            hover:bg-indigo-800 focus:ring-4 focus:outline-hidden
                            focus:ring-indigo-300 font-medium rounded text-sm px-5
                            py-2.5 text-center dark:focus:ring-indigo-900 my-4"
                    {
                        "Voltar ao início"
                    }
                }
            }
        }
    );

    base(title, &[], &content)
}

pub fn log_in_register(form_title: &str, form: &Markup) -> Markup {
    html! {
        div class="flex flex-col items-center justify-center px-6 py-8 mx-auto"
        {
            a href="#" class="flex items-center mb-6 text-2xl font-black uppercase tracking-tighter text-slate-900 dark:text-white"
            {
                img class="w-8 h-8 mr-2" src="/static/favicon-32x32.png" alt="logo";
                "Econo"
            }

            div class="w-full bg-white rounded-3xl shadow dark:border md:mt-0 sm:max-w-md xl:p-0 dark:bg-slate-900 dark:border-slate-800"
            {
                div class="p-6 space-y-4 md:space-y-6 sm:p-8"
                {
                    h1 class="text-xl font-black uppercase leading-tight tracking-tight text-slate-900 md:text-2xl dark:text-white"
                    {
                        (form_title)
                    }

                    (form)
                }
            }
        }
    }
}

pub fn email_input(email: &str, error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label for="email" class=(FORM_LABEL_STYLE) { "E-mail" }

            input
                type="email"
                name="email"
                id="email"
                placeholder="voce@exemplo.com"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                autofocus
                value=(email);

            @if let Some(error_message) = error_message
            {
                p class="text-rose-500 text-base" { (error_message) }
            }
        }
    }
}

pub fn password_input(password: &str, min_length: u8, error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label
                for="password"
                class=(FORM_LABEL_STYLE)
            {
                "Senha"
            }

            input
                type="password"
                name="password"
                id="password"
                placeholder="••••••••"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                value=(password)
                minlength=(min_length);

            @if let Some(error_message) = error_message
            {
                p class="text-rose-500 text-base" { (error_message) }
            }
        }

    }
}

pub fn loading_spinner() -> Markup {
    // Spinner SVG adapted from https://flowbite.com/docs/components/spinner/
    html! {
        svg
            aria-hidden="true"
            role="status"
            class="inline text-white w-4 h-4 me-2 mb-1 animate-spin"
            viewBox="0 0 100 101"
            fill="none"
            xmlns="http://www.w3.org/2000/svg"
        {
            path
                d="M100 50.5908C100 78.2051 77.6142 100.591 50 100.591C22.3858 100.591 0 78.2051 0 50.5908C0 22.9766 22.3858 0.59082 50 0.59082C77.6142 0.59082 100 22.9766 100 50.5908ZM9.08144 50.5908C9.08144 73.1895 27.4013 91.5094 50 91.5094C72.5987 91.5094 90.9186 73.1895 90.9186 50.5908C90.9186 27.9921 72.5987 9.67226 50 9.67226C27.4013 9.67226 9.08144 27.9921 9.08144 50.5908Z"
                fill="#E5E7EB" {}
            path
                d="M93.9676 39.0409C96.393 38.4038 97.8624 35.9116 97.0079 33.5539C95.2932 28.8227 92.871 24.3692 89.8167 20.348C85.8452 15.1192 80.8826 10.7238 75.2124 7.41289C69.5422 4.10194 63.2754 1.94025 56.7698 1.05124C51.7666 0.367541 46.6976 0.446843 41.7345 1.27873C39.2613 1.69328 37.813 4.19778 38.4501 6.62326C39.0873 9.04874 41.5694 10.4717 44.0505 10.1071C47.8511 9.54855 51.7191 9.52689 55.5402 10.0491C60.8642 10.7766 65.9928 12.5457 70.6331 15.2552C75.2735 17.9648 79.3347 21.5619 82.5849 25.841C84.9175 28.9121 86.7997 32.2913 88.1811 35.8758C89.083 38.2158 91.5421 39.6781 93.9676 39.0409Z"
                fill="currentColor" {}
        }
    }
}

/// Returns the CSS styles for adding a "R$" prefix to number inputs.
pub fn currency_input_styles() -> HeadElement {
    HeadElement::Style(PreEscaped(
        r#"
        .input-wrapper {
            position: relative;
            display: block;
        }
        .input-wrapper input[type="number"] {
            padding-left: 2.6rem;
        }
        .input-wrapper::before {
            content: 'R$';
            position: absolute;
            left: 0.9rem;
            top: 50%;
            transform: translateY(-50%);
            font-weight: 900;
            pointer-events: none;
        }
        "#
        .to_owned(),
    ))
}

fn thousands_formatter() -> &'static Formatter {
    static FORMATTER: OnceLock<Formatter> = OnceLock::new();

    FORMATTER.get_or_init(|| {
        Formatter::new()
            .separator(',')
            .unwrap()
            .precision(Precision::Decimals(0))
    })
}

/// Format `number` as Brazilian reais, e.g. "R$ 1.234,56" or "-R$ 12,30".
pub fn format_currency(number: f64) -> String {
    let cents = (number.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    // numfmt groups with the English separator, so swap it for the pt-BR one.
    let whole = thousands_formatter()
        .fmt_string(whole)
        .replace(',', ".");
    let sign = if number < 0.0 && cents > 0 { "-" } else { "" };

    format!("{sign}R$ {whole},{fraction:02}")
}

/// Format `number` with two decimals and a comma as the decimal separator,
/// e.g. "1234,50".
pub fn format_decimal_comma(number: f64) -> String {
    format!("{number:.2}").replace('.', ",")
}

/// Format a date the Brazilian way, e.g. "05/10/2025".
pub fn format_date(date: Date) -> String {
    format!(
        "{:02}/{:02}/{}",
        date.day(),
        u8::from(date.month()),
        date.year()
    )
}

/// A link with indigo text for use in a <p> tag.
pub fn link(url: &str, text: &str) -> Markup {
    html! (
        a href=(url) class=(LINK_STYLE) { (text) }
    )
}
