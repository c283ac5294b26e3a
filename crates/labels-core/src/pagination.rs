/// Largest page GitHub serves for list endpoints
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Helper function to fetch all pages of a resource
///
/// `fetch_page` receives a 1-based page number and the page size. Fetching
/// stops at the first empty or short page.
pub fn fetch_all_pages<T, E, F>(mut fetch_page: F, page_size: usize) -> Result<Vec<T>, E>
where
    F: FnMut(usize, usize) -> Result<Vec<T>, E>,
{
    let mut all_results = Vec::new();
    let mut page = 1;

    loop {
        let page_results = fetch_page(page, page_size)?;
        let page_len = page_results.len();

        all_results.extend(page_results);

        if page_len < page_size || page_len == 0 {
            break;
        }

        page += 1;
    }

    Ok(all_results)
}
