use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::input::{
    DispatchMouseEventParams, DispatchMouseEventType,
};
use chromiumoxide::{Element, Page};

use crate::error::ScraperError;
use crate::extract::{row_cells, RowCells, RowField, RowReader, RowRejection};
use crate::page::{TablePage, ROW_SELECTOR};

const WHEEL_DELTA_Y: f64 = 20_000.0;
const WHEEL_X: f64 = 720.0;
const WHEEL_Y: f64 = 480.0;

/// Selector for the restaurant name inside the second cell.
const NAME_CONTAINER_SELECTOR: &str = "div div";

/// The order-history table on a live page.
pub struct ChromeTable {
    page: Page,
}

impl ChromeTable {
    #[must_use]
    pub fn new(page: Page) -> Self {
        Self { page }
    }
}

#[async_trait]
impl TablePage for ChromeTable {
    async fn row_count(&self) -> Result<usize, ScraperError> {
        self.page
            .evaluate(row_count_script())
            .await?
            .into_value::<usize>()
            .map_err(|e| ScraperError::Command(format!("row count: {e}")))
    }

    async fn press_end(&self) -> Result<(), ScraperError> {
        self.page.find_element("body").await?.press_key("End").await?;
        Ok(())
    }

    async fn scroll_wheel(&self) -> Result<(), ScraperError> {
        let params = DispatchMouseEventParams::builder()
            .r#type(DispatchMouseEventType::MouseWheel)
            .x(WHEEL_X)
            .y(WHEEL_Y)
            .delta_x(0.0)
            .delta_y(WHEEL_DELTA_Y)
            .build()
            .map_err(ScraperError::Command)?;
        self.page.execute(params).await?;
        Ok(())
    }
}

#[async_trait]
impl RowReader for ChromeTable {
    type Row = Element;

    async fn rows(&self) -> Result<Vec<Element>, ScraperError> {
        Ok(self.page.find_elements(ROW_SELECTOR).await?)
    }

    async fn read_row(&self, row: &Element) -> Result<RowCells, RowRejection> {
        let cells = row
            .find_elements("td")
            .await
            .map_err(|e| RowRejection::Unreadable(e.to_string()))?;

        let nested_name = match cells.get(1) {
            Some(cell) => match cell.find_element(NAME_CONTAINER_SELECTOR).await {
                Ok(container) => text_of(&container).await,
                Err(_) => RowField::Absent,
            },
            None => RowField::Absent,
        };

        let mut texts = Vec::with_capacity(cells.len());
        for cell in &cells {
            texts.push(text_of(cell).await);
        }

        row_cells(texts, nested_name)
    }
}

/// Counts rows in the page itself so no element handles are created.
fn row_count_script() -> String {
    format!("document.querySelectorAll({ROW_SELECTOR:?}).length")
}

/// Rendered text of `element`; a failed read counts as absent.
async fn text_of(element: &Element) -> RowField {
    element.inner_text().await.ok().flatten().into()
}
