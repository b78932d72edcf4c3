//! Table views for dashboard data display.
//!
//! Provides the records table, the pagination controls and the monthly statistics panel.

use maud::{Markup, html};

use crate::{
    analytics::SaleStatistics,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency, truncate_words,
    },
    month::SaleMonth,
    pagination::PaginationIndicator,
    record::SaleRecord,
};

const TITLE_MAX_WORDS: usize = 5;
const DESCRIPTION_MAX_WORDS: usize = 10;

const PAGE_BUTTON_STYLE: &str = "px-3 py-2 rounded border border-gray-300 \
    dark:border-gray-600 bg-white dark:bg-gray-800 hover:bg-gray-100 \
    hover:dark:bg-gray-700 cursor-pointer";
const CURRENT_PAGE_STYLE: &str = "px-3 py-2 rounded border border-blue-600 \
    bg-blue-50 text-blue-700 dark:bg-blue-600/20 dark:text-blue-200";

/// Renders the records on the current page.
pub(super) fn records_table(records: &[SaleRecord]) -> Markup {
    html! {
        div class="w-full overflow-x-auto rounded-lg shadow mb-4" {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                thead class=(TABLE_HEADER_STYLE) {
                    tr {
                        th scope="col" class=(TABLE_CELL_STYLE) { "ID" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Title" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Price" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Sold" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Image" }
                    }
                }
                tbody {
                    @for record in records {
                        tr class=(TABLE_ROW_STYLE) {
                            td class=(TABLE_CELL_STYLE) { (record.id) }
                            td class=(TABLE_CELL_STYLE) title=(record.title) {
                                (truncate_words(&record.title, TITLE_MAX_WORDS))
                            }
                            td class=(TABLE_CELL_STYLE) {
                                (truncate_words(&record.description, DESCRIPTION_MAX_WORDS))
                            }
                            td class={(TABLE_CELL_STYLE) " whitespace-nowrap"} {
                                (format_currency(record.price))
                            }
                            td class=(TABLE_CELL_STYLE) { (record.category) }
                            td class=(TABLE_CELL_STYLE) { @if record.sold { "Yes" } @else { "No" } }
                            td class=(TABLE_CELL_STYLE) {
                                @if !record.image.is_empty() {
                                    img src=(record.image) alt=(record.title) class="w-12 h-12 object-contain";
                                }
                            }
                        }
                    }

                    @if records.is_empty() {
                        tr class=(TABLE_ROW_STYLE) {
                            td colspan="7" class={(TABLE_CELL_STYLE) " text-center"} {
                                "No records found"
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders the controls for moving between pages.
///
/// Each control submits the current month and search with the new page number.
pub(super) fn pagination_view(
    indicators: &[PaginationIndicator],
    month: SaleMonth,
    search: &str,
) -> Markup {
    html! {
        nav class="pagination mb-8" aria-label="Records pages" {
            form method="get" action=(endpoints::DASHBOARD_VIEW) {
                input type="hidden" name="month" value=(month.number());
                input type="hidden" name="search" value=(search);

                ul class="pagination flex gap-1 items-center" {
                    @for indicator in indicators {
                        li {
                            @match indicator {
                                PaginationIndicator::BackButton(page) => {
                                    button type="submit" name="page" value=(page) class=(PAGE_BUTTON_STYLE) { "Back" }
                                }
                                PaginationIndicator::Page(page) => {
                                    button type="submit" name="page" value=(page) class=(PAGE_BUTTON_STYLE) { (page) }
                                }
                                PaginationIndicator::CurrPage(page) => {
                                    span aria-current="page" class=(CURRENT_PAGE_STYLE) { (page) }
                                }
                                PaginationIndicator::Ellipsis => {
                                    span class="px-2" { "..." }
                                }
                                PaginationIndicator::NextButton(page) => {
                                    button type="submit" name="page" value=(page) class=(PAGE_BUTTON_STYLE) { "Next" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders the month selector and the search box.
pub(super) fn filter_form(month: SaleMonth, search: &str) -> Markup {
    html! {
        form
            method="get"
            action=(endpoints::DASHBOARD_VIEW)
            class="w-full flex flex-wrap gap-4 items-end mb-4"
        {
            div {
                label for="search" class=(FORM_LABEL_STYLE) { "Search" }
                input
                    type="search"
                    id="search"
                    name="search"
                    value=(search)
                    placeholder="Search by title or category"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div {
                label for="month" class=(FORM_LABEL_STYLE) { "Month" }
                select
                    id="month"
                    name="month"
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for choice in SaleMonth::all() {
                        option value=(choice.number()) selected[choice == month] { (choice.name()) }
                    }
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Apply" }
        }
    }
}

/// Renders the sale totals of a month.
pub(super) fn statistics_table(month: SaleMonth, statistics: &SaleStatistics) -> Markup {
    html! {
        div id="statistics" class="w-full max-w-md mb-8" {
            h3 class="text-xl font-semibold mb-4" { "Statistics - " (month.name()) }

            div class="overflow-x-auto rounded-lg shadow" {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                    tbody {
                        tr class=(TABLE_ROW_STYLE) {
                            th scope="row" class=(TABLE_CELL_STYLE) { "Total sale" }
                            td class=(TABLE_CELL_STYLE) { (format_currency(statistics.total_sale_amount)) }
                        }
                        tr class=(TABLE_ROW_STYLE) {
                            th scope="row" class=(TABLE_CELL_STYLE) { "Total sold items" }
                            td class=(TABLE_CELL_STYLE) { (statistics.total_sold_items) }
                        }
                        tr class=(TABLE_ROW_STYLE) {
                            th scope="row" class=(TABLE_CELL_STYLE) { "Total not sold items" }
                            td class=(TABLE_CELL_STYLE) { (statistics.total_not_sold_items) }
                        }
                    }
                }
            }
        }
    }
}
