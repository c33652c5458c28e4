//! Test utilities shared by the integration suites

use wp_portable_text::portable_text::{Block, ContentBlock};

/// Content blocks only, panicking on anything else
#[allow(dead_code)]
pub fn content_blocks(blocks: &[Block]) -> Vec<&ContentBlock> {
    blocks
        .iter()
        .map(|block| match block {
            Block::Content(content) => content,
            other => panic!("expected a content block, got {other:?}"),
        })
        .collect()
}

/// Plain text of every content block, images skipped
#[allow(dead_code)]
pub fn block_texts(blocks: &[Block]) -> Vec<String> {
    blocks
        .iter()
        .filter_map(Block::as_content)
        .map(ContentBlock::plain_text)
        .collect()
}

/// Every `_key` in output order: blocks, then their mark definitions and spans
#[allow(dead_code)]
pub fn all_keys(blocks: &[Block]) -> Vec<String> {
    let mut keys = Vec::new();
    for block in blocks {
        keys.push(block.key().to_string());
        if let Block::Content(content) = block {
            keys.extend(content.mark_defs.iter().map(|def| def.key.clone()));
            keys.extend(content.children.iter().map(|span| span.key.clone()));
        }
    }
    keys
}

/// A realistic block-editor post body
#[allow(dead_code)]
pub fn gutenberg_post() -> String {
    r#"<!-- wp:paragraph -->
<p>Welcome to the <strong>new</strong> blog. Read the <a href="https://example.org/about" target="_blank" rel="noopener">about page</a>&nbsp;first.</p>
<!-- /wp:paragraph -->

<!-- wp:heading -->
<h2>What&#8217;s changing</h2>
<!-- /wp:heading -->

<!-- wp:list -->
<ul><li>Faster pages</li><li><em>Better</em> search</li></ul>
<!-- /wp:list -->

<!-- wp:image {"id":12} -->
<figure class="wp-block-image"><img src="https://example.org/wp-content/uploads/2024/01/team.jpg" alt="The team"/></figure>
<!-- /wp:image -->

<!-- wp:quote -->
<blockquote class="wp-block-quote"><p>Ship it.</p><p>Then ship again.</p></blockquote>
<!-- /wp:quote -->

<!-- wp:separator -->
<hr class="wp-block-separator"/>
<!-- /wp:separator -->

<!-- wp:table -->
<figure class="wp-block-table"><table><thead><tr><th>Plan</th><th>Price</th></tr></thead><tbody><tr><td>Basic</td><td>$5</td></tr><tr><td>Pro</td><td>$15</td></tr></tbody></table></figure>
<!-- /wp:table -->

<!-- wp:table -->
<table><tr><th>Plan</th><th>Price</th></tr><tr><td>Team</td><td>$50</td></tr></table>
<!-- /wp:table -->"#
        .to_string()
}
