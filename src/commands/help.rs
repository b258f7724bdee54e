use crate::models::Interval;

use super::Dispatch;

pub fn execute() -> Result<Dispatch, String> {
    println!("{}", render());
    Ok(Dispatch::Done)
}

pub fn render() -> String {
    format!(
        "📖 stock-pulse commands\n\
         \n\
         📋 tickers                                 List available tickers\n\
         📈 stock [TICKER] [MINUTES]                Price table and average for one ticker\n\
         🔥 heatmap [TICKER_A] [TICKER_B] [MINUTES] Pearson correlation between two tickers\n\
         ⏱️  interval MINUTES                        Change the window of the current page\n\
         🎨 chart [TICKER] [MINUTES]                Write a PNG price chart\n\
         ❓ help                                    Show this message\n\
         🚪 quit                                    Leave\n\
         \n\
         Intervals: {} minutes",
        Interval::choices()
    )
}
