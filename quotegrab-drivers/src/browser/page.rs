use anyhow::Result;
use fantoccini::{elements::Element, Client, Locator};
use std::time::Duration;

/// Page wrapper providing bounded element waits and CSS queries.
pub struct QuotePage {
    client: Client,
}

impl QuotePage {
    /// Construct a page wrapper around an existing WebDriver client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Wait up to `timeout` for an element matching `selector`.
    ///
    /// Expiry surfaces as an error; callers decide whether that means
    /// failure (quote elements) or normal completion (the "next" control).
    pub async fn wait_for_element(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<PageElement> {
        let element = self
            .client
            .wait()
            .at_most(timeout)
            .for_element(Locator::Css(selector))
            .await?;
        Ok(PageElement::new(self.client.clone(), element))
    }

    /// Find zero or more elements by CSS selector, without waiting.
    pub async fn find_elements(&self, selector: &str) -> Result<Vec<PageElement>> {
        let elements = self.client.find_all(Locator::Css(selector)).await?;
        Ok(elements
            .into_iter()
            .map(|element| PageElement::new(self.client.clone(), element))
            .collect())
    }

    /// Return the current page URL.
    pub async fn current_url(&self) -> Result<String> {
        self.client
            .current_url()
            .await
            .map(|url| url.to_string())
            .map_err(anyhow::Error::from)
    }
}

/// Wrapper for DOM elements with the child queries the collector needs.
pub struct PageElement {
    client: Client,
    element: Element,
}

impl PageElement {
    fn new(client: Client, element: Element) -> Self {
        Self { client, element }
    }

    /// Find a child element by CSS selector.
    pub async fn find_element(&self, selector: &str) -> Result<PageElement> {
        let element = self.element.find(Locator::Css(selector)).await?;
        Ok(PageElement::new(self.client.clone(), element))
    }

    /// Find zero or more child elements by CSS selector.
    pub async fn find_elements(&self, selector: &str) -> Result<Vec<PageElement>> {
        let elements = self.element.find_all(Locator::Css(selector)).await?;
        Ok(elements
            .into_iter()
            .map(|element| PageElement::new(self.client.clone(), element))
            .collect())
    }

    /// Return the element's visible text.
    pub async fn text(&self) -> Result<String> {
        self.element.text().await.map_err(anyhow::Error::from)
    }

    /// Scroll the element into the viewport.
    ///
    /// Fantoccini has no native scroll command, so this goes through script
    /// execution with the element serialized as a WebDriver reference.
    pub async fn scroll_into_view(&self) -> Result<()> {
        self.client
            .execute(
                "arguments[0].scrollIntoView();",
                vec![serde_json::to_value(&self.element)?],
            )
            .await?;
        Ok(())
    }

    /// Click the element. Consumes the wrapper, since a click may navigate
    /// away and invalidate the DOM reference.
    pub async fn click(self) -> Result<()> {
        self.element.click().await?;
        Ok(())
    }
}
