mod dedupe;
mod fetch;
mod helpers;
